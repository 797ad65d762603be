use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneticsError {
    #[error("Chromosome number {number} already exists for species {species}")]
    DuplicateChromosomeNumber { number: u32, species: u64 },

    #[error("Chromosome pair mismatch: {0}")]
    ChromosomePairMismatch(String),

    #[error("Unknown inheritance pattern: '{0}'")]
    UnknownInheritancePattern(String),

    #[error("Gene position {position} is already occupied on chromosome pair {pair}")]
    DuplicateGenePosition { position: u32, pair: u64 },

    #[error("Allele symbol '{symbol}' already exists for gene {gene}")]
    DuplicateAlleleSymbol { symbol: String, gene: u64 },

    #[error("Allele {allele} does not belong to a gene on chromosome pair {pair}")]
    AlleleNotOnPair { allele: u64, pair: u64 },

    #[error(
        "A genotype already exists for animal {animal} on chromosome pair {pair} for trait {trait_id}"
    )]
    DuplicateGenotype {
        animal: u64,
        pair: u64,
        trait_id: u64,
    },

    #[error("Invalid lineage edge: {0}")]
    InvalidLineageEdge(String),

    #[error("{entity} with id {id} not found in snapshot")]
    NotFound { entity: &'static str, id: u64 },

    #[error("Animal {0} has no recorded lineage edges")]
    NoLineage(u64),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, GeneticsError>;
