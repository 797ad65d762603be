use std::fmt;
use std::str::FromStr;

use crate::error::GeneticsError;
use crate::types::{AlleleId, ChromosomePairId, GeneId};

/// Broad functional category of a gene, used for display grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneCategory {
    Coat,
    Health,
    Morphology,
    Behavior,
    Other,
}

impl FromStr for GeneCategory {
    type Err = GeneticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "coat" => Ok(GeneCategory::Coat),
            "health" => Ok(GeneCategory::Health),
            "morphology" => Ok(GeneCategory::Morphology),
            "behavior" | "behaviour" => Ok(GeneCategory::Behavior),
            "other" | "" => Ok(GeneCategory::Other),
            other => Err(GeneticsError::Parse(format!(
                "Unknown gene category: '{}'",
                other
            ))),
        }
    }
}

/// How strongly variation at this gene affects the animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImpactLevel {
    Cosmetic,
    Minor,
    Major,
}

/// Health-risk level carried by an allele.
///
/// The compatibility validator flags shared non-wild-type alleles whose
/// risk level is above `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    None,
    Low,
    Moderate,
    High,
}

impl FromStr for RiskLevel {
    type Err = GeneticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(RiskLevel::None),
            "low" => Ok(RiskLevel::Low),
            "moderate" | "medium" => Ok(RiskLevel::Moderate),
            "high" => Ok(RiskLevel::High),
            other => Err(GeneticsError::Parse(format!(
                "Unknown risk level: '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::None => "none",
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
        };
        f.write_str(s)
    }
}

/// A gene locus on a chromosome pair. `position` is unique within the pair.
#[derive(Debug, Clone)]
pub struct Gene {
    pub id: GeneId,
    pub chromosome_pair_id: ChromosomePairId,
    pub name: String,
    pub position: u32,
    pub category: GeneCategory,
    pub impact_level: ImpactLevel,
}

/// One allele of a gene. `symbol` is unique within the gene.
#[derive(Debug, Clone)]
pub struct Allele {
    pub id: AlleleId,
    pub gene_id: GeneId,
    pub symbol: String,
    /// Whether this is the reference (wild-type) allele for the gene.
    pub is_wild_type: bool,
    /// Whether a non-wild-type allele overrides the wild-type phenotype
    /// in a heterozygous pair.
    pub is_dominant: bool,
    pub phenotype: String,
    pub risk_level: RiskLevel,
}
