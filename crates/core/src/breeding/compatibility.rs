use crate::error::Result;
use crate::lineage::inbreeding_coefficient;
use crate::model::{RiskLevel, Sex};
use crate::snapshot::SnapshotSource;
use crate::types::{AnimalId, Scalar};

use super::loci::shared_locus_crosses;
use super::outcome::{cross_locus, LocusCross};

/// Tunable thresholds for pair validation.
#[derive(Debug, Clone)]
pub struct CompatibilityConfig {
    /// Inbreeding coefficient above which a pairing is flagged as a risk.
    pub inbreeding_threshold: Scalar,
}

impl Default for CompatibilityConfig {
    fn default() -> Self {
        // 0.125 is the first-cousin level of relatedness.
        Self {
            inbreeding_threshold: 0.125,
        }
    }
}

/// A shared deleterious allele both parents carry, with the probability of
/// an offspring homozygous for it.
#[derive(Debug, Clone)]
pub struct InheritanceRisk {
    pub trait_name: String,
    pub gene_name: String,
    pub allele_symbol: String,
    pub risk_level: RiskLevel,
    pub probability: Scalar,
}

/// One flagged risk for a prospective pairing.
#[derive(Debug, Clone)]
pub enum BreedingRisk {
    Inbreeding {
        coefficient: Scalar,
        threshold: Scalar,
    },
    Inheritance(InheritanceRisk),
}

/// Aggregated verdict for a prospective pairing.
///
/// `is_compatible` is false only on hard violations (identical animals);
/// everything else surfaces as warnings or risks so that exploratory
/// what-if queries still return a full picture.
#[derive(Debug, Clone)]
pub struct BreedingCompatibilityResult {
    pub is_compatible: bool,
    pub inbreeding_coefficient: Scalar,
    pub warnings: Vec<String>,
    pub risks: Vec<BreedingRisk>,
}

/// Validate a prospective dam/sire pairing.
///
/// Checks, in order: identical animals (hard violation), species mismatch
/// (warning), recorded sex consistency (warning), inbreeding coefficient
/// against the configured threshold (risk), and shared deleterious alleles
/// (risk per allele, with the homozygous-offspring probability).
///
/// # Errors
/// Returns `NotFound` if either animal is missing from the snapshot, or if
/// a genotype references a missing allele or gene.
pub fn validate_breeding_pair<S: SnapshotSource>(
    store: &S,
    config: &CompatibilityConfig,
    dam: AnimalId,
    sire: AnimalId,
) -> Result<BreedingCompatibilityResult> {
    let mut warnings = Vec::new();
    let mut risks = Vec::new();
    let mut is_compatible = true;

    if dam == sire {
        warnings.push(format!(
            "Dam and sire are the same animal ({})",
            dam
        ));
        is_compatible = false;
    }

    let dam_animal = store.load_animal(dam)?;
    let sire_animal = store.load_animal(sire)?;

    if dam_animal.species_id != sire_animal.species_id {
        log::warn!(
            "Pairing {}/{} crosses species {} and {}",
            dam,
            sire,
            dam_animal.species_id,
            sire_animal.species_id
        );
        warnings.push(format!(
            "'{}' and '{}' belong to different species",
            dam_animal.name, sire_animal.name
        ));
    }

    if dam_animal.sex == Sex::Male {
        warnings.push(format!("Dam '{}' is recorded as male", dam_animal.name));
    }
    if sire_animal.sex == Sex::Female {
        warnings.push(format!("Sire '{}' is recorded as female", sire_animal.name));
    }

    let coefficient = inbreeding_coefficient(store, dam, sire)?;
    if coefficient > config.inbreeding_threshold {
        risks.push(BreedingRisk::Inbreeding {
            coefficient,
            threshold: config.inbreeding_threshold,
        });
    }

    let loci = shared_locus_crosses(store, dam, sire)?;
    for risk in inheritance_risks(store, &loci)? {
        risks.push(BreedingRisk::Inheritance(risk));
    }

    Ok(BreedingCompatibilityResult {
        is_compatible,
        inbreeding_coefficient: coefficient,
        warnings,
        risks,
    })
}

/// Scan a breeding pair's shared loci for deleterious alleles carried by
/// both parents.
pub fn analyze_genetic_risks<S: SnapshotSource>(
    store: &S,
    dam: AnimalId,
    sire: AnimalId,
) -> Result<Vec<InheritanceRisk>> {
    let loci = shared_locus_crosses(store, dam, sire)?;
    inheritance_risks(store, &loci)
}

fn inheritance_risks<S: SnapshotSource>(
    store: &S,
    loci: &[LocusCross],
) -> Result<Vec<InheritanceRisk>> {
    let mut risks = Vec::new();

    for cross in loci {
        let dam_alleles = [&cross.dam.maternal, &cross.dam.paternal];
        let sire_alleles = [&cross.sire.maternal, &cross.sire.paternal];

        let mut flagged: Vec<u64> = Vec::new();
        for allele in dam_alleles {
            if allele.is_wild_type || allele.risk_level <= RiskLevel::Low {
                continue;
            }
            if !sire_alleles.iter().any(|a| a.id == allele.id) {
                continue;
            }
            if flagged.contains(&allele.id) {
                continue;
            }
            flagged.push(allele.id);

            let probability: Scalar = cross_locus(cross)
                .iter()
                .filter(|o| o.homozygous_for(allele.id))
                .map(|o| o.probability)
                .sum();
            let gene = store.load_gene(allele.gene_id)?;

            risks.push(InheritanceRisk {
                trait_name: cross.trait_name.clone(),
                gene_name: gene.name.clone(),
                allele_symbol: allele.symbol.clone(),
                risk_level: allele.risk_level,
                probability,
            });
        }
    }

    Ok(risks)
}
