use std::fmt;
use std::str::FromStr;

use crate::error::GeneticsError;
use crate::types::{ChromosomeId, ChromosomePairId, SpeciesId};

/// How a chromosome pair is transmitted to offspring.
///
/// Kept as a closed enum so the registry's legality check is exhaustive
/// rather than an ad-hoc string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InheritancePattern {
    Autosomal,
    XLinked,
    YLinked,
    Mitochondrial,
}

impl FromStr for InheritancePattern {
    type Err = GeneticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "autosomal" => Ok(InheritancePattern::Autosomal),
            "x-linked" | "xlinked" => Ok(InheritancePattern::XLinked),
            "y-linked" | "ylinked" => Ok(InheritancePattern::YLinked),
            "mitochondrial" => Ok(InheritancePattern::Mitochondrial),
            other => Err(GeneticsError::UnknownInheritancePattern(other.to_string())),
        }
    }
}

impl fmt::Display for InheritancePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InheritancePattern::Autosomal => "autosomal",
            InheritancePattern::XLinked => "x-linked",
            InheritancePattern::YLinked => "y-linked",
            InheritancePattern::Mitochondrial => "mitochondrial",
        };
        f.write_str(s)
    }
}

/// A single chromosome. `number` is unique within a species.
#[derive(Debug, Clone)]
pub struct Chromosome {
    pub id: ChromosomeId,
    pub name: String,
    pub number: u32,
    pub species_id: SpeciesId,
}

/// A maternal/paternal chromosome pair.
///
/// Both member chromosomes must belong to the same species and carry the
/// same chromosome number; the registry enforces this at construction.
#[derive(Debug, Clone)]
pub struct ChromosomePair {
    pub id: ChromosomePairId,
    pub maternal_chromosome_id: ChromosomeId,
    pub paternal_chromosome_id: ChromosomeId,
    pub inheritance_pattern: InheritancePattern,
}
