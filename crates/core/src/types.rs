/// The scalar type used for probabilities and coefficients.
pub type Scalar = f64;

/// Identifier for an animal record.
pub type AnimalId = u64;

/// Identifier for a species.
pub type SpeciesId = u64;

/// Identifier for a single chromosome.
pub type ChromosomeId = u64;

/// Identifier for a maternal/paternal chromosome pair.
pub type ChromosomePairId = u64;

/// Identifier for a gene locus on a chromosome pair.
pub type GeneId = u64;

/// Identifier for an allele of a gene.
pub type AlleleId = u64;

/// Identifier for an animal's genotype at one locus.
pub type GenotypeId = u64;

/// Identifier for a heritable trait.
pub type TraitId = u64;

/// Identifier for a recorded (observed) trait on an animal.
pub type TraitRecordId = u64;

/// Identifier for a dam/sire pairing within a project.
pub type PairingId = u64;

/// Identifier for a breeding project.
pub type ProjectId = u64;

/// Identifier for one breeding-calculation run.
pub type CalculationId = u64;
