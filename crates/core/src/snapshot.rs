use std::collections::HashMap;
use std::path::Path;

use crate::error::{GeneticsError, Result};
use crate::model::{
    Allele, Animal, Chromosome, ChromosomePair, Gene, Genotype, LineageEdge, LineageSide, Pairing,
    Sex, TraitRecord,
};
use crate::types::{
    AlleleId, AnimalId, ChromosomeId, ChromosomePairId, GeneId, PairingId,
};

/// Read-only snapshot of the entities the engine computes over.
///
/// The persistence collaborator implements this trait; the core never
/// triggers loads as a side effect of reading a field, and never observes
/// caching behaviour. All methods are cheap lookups over already-loaded
/// data.
pub trait SnapshotSource {
    /// # Errors
    /// Returns `NotFound` if the animal is not in the snapshot.
    fn load_animal(&self, id: AnimalId) -> Result<&Animal>;

    /// All recorded ancestor edges for an animal. An empty slice is a valid
    /// domain state ("no known lineage"), not an error.
    fn load_lineage_edges(&self, animal: AnimalId) -> &[LineageEdge];

    /// All observed trait records for an animal. May be empty.
    fn load_animal_traits(&self, animal: AnimalId) -> &[TraitRecord];

    /// Genotypes recorded for an animal, optionally restricted to one
    /// chromosome pair.
    fn load_genotypes(
        &self,
        animal: AnimalId,
        pair: Option<ChromosomePairId>,
    ) -> Vec<&Genotype>;

    fn load_chromosome(&self, id: ChromosomeId) -> Result<&Chromosome>;

    fn load_chromosome_pair(&self, id: ChromosomePairId) -> Result<&ChromosomePair>;

    fn load_gene(&self, id: GeneId) -> Result<&Gene>;

    fn load_allele(&self, id: AlleleId) -> Result<&Allele>;

    fn load_pairing(&self, id: PairingId) -> Result<&Pairing>;
}

/// In-memory snapshot backing both the test suite and the CLI.
///
/// Entities are inserted through [`crate::registry::Registry`], which
/// performs the uniqueness and legality checks before anything lands here.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshot {
    pub(crate) animals: HashMap<AnimalId, Animal>,
    pub(crate) lineage: HashMap<AnimalId, Vec<LineageEdge>>,
    pub(crate) trait_records: HashMap<AnimalId, Vec<TraitRecord>>,
    pub(crate) chromosomes: HashMap<ChromosomeId, Chromosome>,
    pub(crate) chromosome_pairs: HashMap<ChromosomePairId, ChromosomePair>,
    pub(crate) genes: HashMap<GeneId, Gene>,
    pub(crate) alleles: HashMap<AlleleId, Allele>,
    pub(crate) genotypes: Vec<Genotype>,
    pub(crate) pairings: HashMap<PairingId, Pairing>,
    next_id: u64,
}

impl MemorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next sequential entity id.
    pub(crate) fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn n_animals(&self) -> usize {
        self.animals.len()
    }

    pub fn n_genotypes(&self) -> usize {
        self.genotypes.len()
    }

    /// Read lineage edges from a CSV file into the snapshot.
    ///
    /// Expected columns (header required): `animal`, `ancestor`,
    /// `generation`, `side`. An optional `sequence` column disambiguates
    /// ancestors at the same generation and side; missing values default
    /// to the row order within the file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, columns are missing,
    /// ids or generations fail to parse, or an edge is self-referential.
    pub fn lineage_from_csv<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path.as_ref())?;

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.to_lowercase())
            .collect();

        let animal_col = find_column(&headers, "animal")?;
        let ancestor_col = find_column(&headers, "ancestor")?;
        let generation_col = find_column(&headers, "generation")?;
        let side_col = find_column(&headers, "side")?;
        let sequence_col = headers.iter().position(|h| h == "sequence");

        let mut count = 0usize;
        for (row, result) in reader.records().enumerate() {
            let record = result?;
            let animal = parse_id(get_field(&record, animal_col, "animal")?)?;
            let ancestor = parse_id(get_field(&record, ancestor_col, "ancestor")?)?;
            let generation: u32 = get_field(&record, generation_col, "generation")?
                .parse()
                .map_err(|_| {
                    GeneticsError::Parse(format!("Bad generation in lineage row {}", row + 1))
                })?;
            let side: LineageSide = get_field(&record, side_col, "side")?.parse()?;
            let sequence = match sequence_col {
                Some(col) => {
                    let raw = get_field(&record, col, "sequence")?;
                    if raw.is_empty() {
                        row as u32
                    } else {
                        raw.parse().map_err(|_| {
                            GeneticsError::Parse(format!(
                                "Bad sequence in lineage row {}",
                                row + 1
                            ))
                        })?
                    }
                }
                None => row as u32,
            };

            self.insert_lineage_edge(LineageEdge {
                animal_id: animal,
                ancestor_id: ancestor,
                generation,
                sequence,
                side,
            })?;
            count += 1;
        }

        Ok(count)
    }

    /// Read observed trait records from a CSV file.
    ///
    /// Expected columns: `animal`, `trait_type`, `name`.
    pub fn traits_from_csv<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path.as_ref())?;

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.to_lowercase())
            .collect();

        let animal_col = find_column(&headers, "animal")?;
        let type_col = find_column(&headers, "trait_type")?;
        let name_col = find_column(&headers, "name")?;

        let mut count = 0usize;
        for result in reader.records() {
            let record = result?;
            let animal = parse_id(get_field(&record, animal_col, "animal")?)?;
            let trait_type = get_field(&record, type_col, "trait_type")?.to_string();
            let name = get_field(&record, name_col, "name")?.to_string();

            let id = self.next_id();
            self.trait_records
                .entry(animal)
                .or_default()
                .push(TraitRecord {
                    id,
                    animal_id: animal,
                    trait_type,
                    name,
                });
            count += 1;
        }

        Ok(count)
    }

    /// Read animal records from a CSV file.
    ///
    /// Expected columns: `animal`, `name`, `sex`, `species`.
    pub fn animals_from_csv<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path.as_ref())?;

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.to_lowercase())
            .collect();

        let animal_col = find_column(&headers, "animal")?;
        let name_col = find_column(&headers, "name")?;
        let sex_col = find_column(&headers, "sex")?;
        let species_col = find_column(&headers, "species")?;

        let mut count = 0usize;
        for result in reader.records() {
            let record = result?;
            let id = parse_id(get_field(&record, animal_col, "animal")?)?;
            let name = get_field(&record, name_col, "name")?.to_string();
            let sex: Sex = get_field(&record, sex_col, "sex")?.parse()?;
            let species_id = parse_id(get_field(&record, species_col, "species")?)?;

            self.animals.insert(
                id,
                Animal {
                    id,
                    name,
                    sex,
                    species_id,
                },
            );
            count += 1;
        }

        Ok(count)
    }

    /// Insert a lineage edge, rejecting malformed records.
    pub(crate) fn insert_lineage_edge(&mut self, edge: LineageEdge) -> Result<()> {
        if edge.generation == 0 {
            return Err(GeneticsError::InvalidLineageEdge(format!(
                "Edge {} -> {} has generation 0; generations start at 1",
                edge.animal_id, edge.ancestor_id
            )));
        }
        if edge.animal_id == edge.ancestor_id {
            return Err(GeneticsError::InvalidLineageEdge(format!(
                "Animal {} is recorded as its own ancestor",
                edge.animal_id
            )));
        }
        self.lineage.entry(edge.animal_id).or_default().push(edge);
        Ok(())
    }
}

impl SnapshotSource for MemorySnapshot {
    fn load_animal(&self, id: AnimalId) -> Result<&Animal> {
        self.animals.get(&id).ok_or(GeneticsError::NotFound {
            entity: "Animal",
            id,
        })
    }

    fn load_lineage_edges(&self, animal: AnimalId) -> &[LineageEdge] {
        self.lineage.get(&animal).map(Vec::as_slice).unwrap_or(&[])
    }

    fn load_animal_traits(&self, animal: AnimalId) -> &[TraitRecord] {
        self.trait_records
            .get(&animal)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn load_genotypes(
        &self,
        animal: AnimalId,
        pair: Option<ChromosomePairId>,
    ) -> Vec<&Genotype> {
        self.genotypes
            .iter()
            .filter(|g| g.animal_id == animal)
            .filter(|g| pair.map_or(true, |p| g.chromosome_pair_id == p))
            .collect()
    }

    fn load_chromosome(&self, id: ChromosomeId) -> Result<&Chromosome> {
        self.chromosomes.get(&id).ok_or(GeneticsError::NotFound {
            entity: "Chromosome",
            id,
        })
    }

    fn load_chromosome_pair(&self, id: ChromosomePairId) -> Result<&ChromosomePair> {
        self.chromosome_pairs
            .get(&id)
            .ok_or(GeneticsError::NotFound {
                entity: "ChromosomePair",
                id,
            })
    }

    fn load_gene(&self, id: GeneId) -> Result<&Gene> {
        self.genes.get(&id).ok_or(GeneticsError::NotFound {
            entity: "Gene",
            id,
        })
    }

    fn load_allele(&self, id: AlleleId) -> Result<&Allele> {
        self.alleles.get(&id).ok_or(GeneticsError::NotFound {
            entity: "Allele",
            id,
        })
    }

    fn load_pairing(&self, id: PairingId) -> Result<&Pairing> {
        self.pairings.get(&id).ok_or(GeneticsError::NotFound {
            entity: "Pairing",
            id,
        })
    }
}

fn find_column(headers: &[String], name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| GeneticsError::Parse(format!("CSV missing '{}' column", name)))
}

fn get_field<'r>(
    record: &'r csv::StringRecord,
    col: usize,
    name: &str,
) -> Result<&'r str> {
    record
        .get(col)
        .ok_or_else(|| GeneticsError::Parse(format!("Missing {} field in row", name)))
}

fn parse_id(s: &str) -> Result<u64> {
    s.trim()
        .parse()
        .map_err(|_| GeneticsError::Parse(format!("Bad id: '{}'", s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    /// Helper: write CSV content to a temporary file and return the path.
    fn write_temp_csv(content: &str) -> String {
        let dir = std::env::temp_dir();
        let id = COUNTER.fetch_add(1, Ordering::Relaxed);
        let file_name = format!("test_snapshot_{}_{}.csv", std::process::id(), id);
        let path = dir.join(file_name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_lineage_from_csv_basic() {
        let csv = "animal,ancestor,generation,side,sequence\n\
                   10,20,1,maternal,0\n\
                   10,21,1,paternal,0\n\
                   10,30,2,maternal,1\n";
        let path = write_temp_csv(csv);
        let mut snap = MemorySnapshot::new();
        let n = snap.lineage_from_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(n, 3);
        let edges = snap.load_lineage_edges(10);
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[0].ancestor_id, 20);
        assert_eq!(edges[0].side, LineageSide::Maternal);
        assert_eq!(edges[2].generation, 2);
    }

    #[test]
    fn test_lineage_from_csv_missing_column() {
        let csv = "animal,ancestor,side\n1,2,maternal\n";
        let path = write_temp_csv(csv);
        let mut snap = MemorySnapshot::new();
        let result = snap.lineage_from_csv(&path);
        std::fs::remove_file(&path).ok();

        assert!(result.is_err());
        let msg = format!("{}", result.unwrap_err());
        assert!(msg.contains("generation"), "Error was: {}", msg);
    }

    #[test]
    fn test_lineage_rejects_generation_zero() {
        let mut snap = MemorySnapshot::new();
        let result = snap.insert_lineage_edge(LineageEdge {
            animal_id: 1,
            ancestor_id: 2,
            generation: 0,
            sequence: 0,
            side: LineageSide::Maternal,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_lineage_rejects_self_ancestor() {
        let mut snap = MemorySnapshot::new();
        let result = snap.insert_lineage_edge(LineageEdge {
            animal_id: 7,
            ancestor_id: 7,
            generation: 1,
            sequence: 0,
            side: LineageSide::Paternal,
        });
        assert!(result.is_err());
        let msg = format!("{}", result.unwrap_err());
        assert!(msg.contains("own ancestor"), "Error was: {}", msg);
    }

    #[test]
    fn test_animals_from_csv() {
        let csv = "animal,name,sex,species\n1,Clover,F,5\n2,Basil,M,5\n";
        let path = write_temp_csv(csv);
        let mut snap = MemorySnapshot::new();
        let n = snap.animals_from_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(n, 2);
        let clover = snap.load_animal(1).unwrap();
        assert_eq!(clover.name, "Clover");
        assert_eq!(clover.sex, Sex::Female);
        assert!(snap.load_animal(99).is_err());
    }

    #[test]
    fn test_traits_from_csv_groups_by_animal() {
        let csv = "animal,trait_type,name\n1,Coat,Agouti\n1,Coat,Rex\n2,Ear,Lop\n";
        let path = write_temp_csv(csv);
        let mut snap = MemorySnapshot::new();
        snap.traits_from_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(snap.load_animal_traits(1).len(), 2);
        assert_eq!(snap.load_animal_traits(2).len(), 1);
        assert!(snap.load_animal_traits(3).is_empty());
    }

    #[test]
    fn test_empty_lookups_are_benign() {
        let snap = MemorySnapshot::new();
        assert!(snap.load_lineage_edges(1).is_empty());
        assert!(snap.load_genotypes(1, None).is_empty());
    }
}
