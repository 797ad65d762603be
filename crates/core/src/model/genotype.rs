use std::time::SystemTime;

use crate::types::{
    AlleleId, AnimalId, CalculationId, ChromosomePairId, GenotypeId, PairingId, Scalar, TraitId,
};

/// An animal's allele pair at one locus.
///
/// At most one genotype exists per (animal, chromosome pair, trait); the
/// registry rejects duplicates.
#[derive(Debug, Clone)]
pub struct Genotype {
    pub id: GenotypeId,
    pub animal_id: AnimalId,
    pub chromosome_pair_id: ChromosomePairId,
    pub maternal_allele_id: AlleleId,
    pub paternal_allele_id: AlleleId,
    pub trait_id: TraitId,
    /// Display code for the allele pair, e.g. "Aa".
    pub genotype_code: String,
}

/// Container for one offspring-probability evaluation run.
///
/// Recomputation creates a new calculation rather than mutating an old one.
#[derive(Debug, Clone)]
pub struct BreedingCalculation {
    pub id: CalculationId,
    pub pairing_id: PairingId,
    pub dam_id: AnimalId,
    pub sire_id: AnimalId,
    pub created_at: SystemTime,
}

/// One distinct merged offspring outcome of a breeding calculation.
///
/// Probabilities across all rows of a calculation sum to 1.0 within
/// floating tolerance.
#[derive(Debug, Clone)]
pub struct PossibleOffspring {
    pub probability: Scalar,
    pub phenotype: String,
    pub genotype_description: String,
    /// Allele symbols the dam can contribute to this outcome, per locus.
    pub maternal_alleles: Vec<String>,
    /// Allele symbols the sire can contribute to this outcome, per locus.
    pub paternal_alleles: Vec<String>,
}
