mod compatibility;
mod loci;
mod outcome;

pub use compatibility::{
    analyze_genetic_risks, validate_breeding_pair, BreedingCompatibilityResult, BreedingRisk,
    CompatibilityConfig, InheritanceRisk,
};
pub use loci::shared_locus_crosses;
pub use outcome::{
    cross_locus, offspring_probabilities, resolve_phenotype, trait_probabilities, LocusCross,
    LocusOutcome, ParentalAlleles, PROBABILITY_TOLERANCE,
};
