mod animal;
mod chromosome;
mod gene;
mod genotype;

pub use animal::{Animal, LineageEdge, LineageSide, Pairing, Sex, TraitRecord};
pub use chromosome::{Chromosome, ChromosomePair, InheritancePattern};
pub use gene::{Allele, Gene, GeneCategory, ImpactLevel, RiskLevel};
pub use genotype::{BreedingCalculation, Genotype, PossibleOffspring};
