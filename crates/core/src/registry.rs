use crate::error::{GeneticsError, Result};
use crate::model::{
    Allele, Animal, Chromosome, ChromosomePair, Gene, GeneCategory, Genotype, ImpactLevel,
    InheritancePattern, LineageEdge, LineageSide, Pairing, RiskLevel, Sex, TraitRecord,
};
use crate::snapshot::MemorySnapshot;
use crate::types::{
    AlleleId, AnimalId, ChromosomeId, ChromosomePairId, GeneId, GenotypeId, PairingId, ProjectId,
    SpeciesId, TraitId,
};

/// Validating constructor for genetic-model entities.
///
/// All uniqueness and legality checks happen here, before anything is
/// inserted into the snapshot; a failed operation leaves the snapshot
/// untouched. Entities are immutable once created.
pub struct Registry<'a> {
    snapshot: &'a mut MemorySnapshot,
}

impl<'a> Registry<'a> {
    pub fn new(snapshot: &'a mut MemorySnapshot) -> Self {
        Self { snapshot }
    }

    /// Create a chromosome.
    ///
    /// # Errors
    /// Fails if a chromosome with the same number already exists for the
    /// species.
    pub fn create_chromosome(
        &mut self,
        name: &str,
        number: u32,
        species_id: SpeciesId,
    ) -> Result<ChromosomeId> {
        let duplicate = self
            .snapshot
            .chromosomes
            .values()
            .any(|c| c.species_id == species_id && c.number == number);
        if duplicate {
            return Err(GeneticsError::DuplicateChromosomeNumber {
                number,
                species: species_id,
            });
        }

        let id = self.snapshot.next_id();
        self.snapshot.chromosomes.insert(
            id,
            Chromosome {
                id,
                name: name.to_string(),
                number,
                species_id,
            },
        );
        Ok(id)
    }

    /// Create a maternal/paternal chromosome pair.
    ///
    /// # Errors
    /// Fails if either chromosome is missing, or the two differ in species
    /// or chromosome number.
    pub fn create_chromosome_pair(
        &mut self,
        maternal_id: ChromosomeId,
        paternal_id: ChromosomeId,
        pattern: InheritancePattern,
    ) -> Result<ChromosomePairId> {
        let maternal = self
            .snapshot
            .chromosomes
            .get(&maternal_id)
            .ok_or(GeneticsError::NotFound {
                entity: "Chromosome",
                id: maternal_id,
            })?;
        let paternal = self
            .snapshot
            .chromosomes
            .get(&paternal_id)
            .ok_or(GeneticsError::NotFound {
                entity: "Chromosome",
                id: paternal_id,
            })?;

        if maternal.species_id != paternal.species_id {
            return Err(GeneticsError::ChromosomePairMismatch(format!(
                "chromosomes {} and {} belong to different species ({} vs {})",
                maternal_id, paternal_id, maternal.species_id, paternal.species_id
            )));
        }
        if maternal.number != paternal.number {
            return Err(GeneticsError::ChromosomePairMismatch(format!(
                "chromosomes {} and {} carry different numbers ({} vs {})",
                maternal_id, paternal_id, maternal.number, paternal.number
            )));
        }

        let id = self.snapshot.next_id();
        self.snapshot.chromosome_pairs.insert(
            id,
            ChromosomePair {
                id,
                maternal_chromosome_id: maternal_id,
                paternal_chromosome_id: paternal_id,
                inheritance_pattern: pattern,
            },
        );
        Ok(id)
    }

    /// Create a gene locus on a chromosome pair.
    ///
    /// # Errors
    /// Fails if the pair is missing or another gene already occupies the
    /// position.
    pub fn create_gene(
        &mut self,
        chromosome_pair_id: ChromosomePairId,
        name: &str,
        position: u32,
        category: GeneCategory,
        impact_level: ImpactLevel,
    ) -> Result<GeneId> {
        if !self
            .snapshot
            .chromosome_pairs
            .contains_key(&chromosome_pair_id)
        {
            return Err(GeneticsError::NotFound {
                entity: "ChromosomePair",
                id: chromosome_pair_id,
            });
        }
        let occupied = self
            .snapshot
            .genes
            .values()
            .any(|g| g.chromosome_pair_id == chromosome_pair_id && g.position == position);
        if occupied {
            return Err(GeneticsError::DuplicateGenePosition {
                position,
                pair: chromosome_pair_id,
            });
        }

        let id = self.snapshot.next_id();
        self.snapshot.genes.insert(
            id,
            Gene {
                id,
                chromosome_pair_id,
                name: name.to_string(),
                position,
                category,
                impact_level,
            },
        );
        Ok(id)
    }

    /// Create an allele of a gene.
    ///
    /// # Errors
    /// Fails if the gene is missing or already has an allele with the
    /// same symbol.
    #[allow(clippy::too_many_arguments)]
    pub fn create_allele(
        &mut self,
        gene_id: GeneId,
        symbol: &str,
        is_wild_type: bool,
        is_dominant: bool,
        phenotype: &str,
        risk_level: RiskLevel,
    ) -> Result<AlleleId> {
        if !self.snapshot.genes.contains_key(&gene_id) {
            return Err(GeneticsError::NotFound {
                entity: "Gene",
                id: gene_id,
            });
        }
        let duplicate = self
            .snapshot
            .alleles
            .values()
            .any(|a| a.gene_id == gene_id && a.symbol == symbol);
        if duplicate {
            return Err(GeneticsError::DuplicateAlleleSymbol {
                symbol: symbol.to_string(),
                gene: gene_id,
            });
        }

        let id = self.snapshot.next_id();
        self.snapshot.alleles.insert(
            id,
            Allele {
                id,
                gene_id,
                symbol: symbol.to_string(),
                is_wild_type,
                is_dominant,
                phenotype: phenotype.to_string(),
                risk_level,
            },
        );
        Ok(id)
    }

    /// Record an animal's genotype at one locus.
    ///
    /// # Errors
    /// Fails if either allele's gene is not on the given chromosome pair,
    /// or a genotype already exists for (animal, pair, trait).
    #[allow(clippy::too_many_arguments)]
    pub fn assign_genotype(
        &mut self,
        animal_id: AnimalId,
        chromosome_pair_id: ChromosomePairId,
        maternal_allele_id: AlleleId,
        paternal_allele_id: AlleleId,
        trait_id: TraitId,
        genotype_code: &str,
    ) -> Result<GenotypeId> {
        for allele_id in [maternal_allele_id, paternal_allele_id] {
            let allele =
                self.snapshot
                    .alleles
                    .get(&allele_id)
                    .ok_or(GeneticsError::NotFound {
                        entity: "Allele",
                        id: allele_id,
                    })?;
            let gene =
                self.snapshot
                    .genes
                    .get(&allele.gene_id)
                    .ok_or(GeneticsError::NotFound {
                        entity: "Gene",
                        id: allele.gene_id,
                    })?;
            if gene.chromosome_pair_id != chromosome_pair_id {
                return Err(GeneticsError::AlleleNotOnPair {
                    allele: allele_id,
                    pair: chromosome_pair_id,
                });
            }
        }

        let duplicate = self.snapshot.genotypes.iter().any(|g| {
            g.animal_id == animal_id
                && g.chromosome_pair_id == chromosome_pair_id
                && g.trait_id == trait_id
        });
        if duplicate {
            return Err(GeneticsError::DuplicateGenotype {
                animal: animal_id,
                pair: chromosome_pair_id,
                trait_id,
            });
        }

        let id = self.snapshot.next_id();
        self.snapshot.genotypes.push(Genotype {
            id,
            animal_id,
            chromosome_pair_id,
            maternal_allele_id,
            paternal_allele_id,
            trait_id,
            genotype_code: genotype_code.to_string(),
        });
        Ok(id)
    }

    /// Register an animal snapshot. Overwrites nothing.
    pub fn register_animal(
        &mut self,
        id: AnimalId,
        name: &str,
        sex: Sex,
        species_id: SpeciesId,
    ) -> Result<()> {
        if self.snapshot.animals.contains_key(&id) {
            return Err(GeneticsError::Parse(format!(
                "Animal {} already registered",
                id
            )));
        }
        self.snapshot.animals.insert(
            id,
            Animal {
                id,
                name: name.to_string(),
                sex,
                species_id,
            },
        );
        Ok(())
    }

    /// Record a directed ancestor edge for an animal.
    ///
    /// # Errors
    /// Fails on generation 0 or a self-referential edge.
    pub fn add_lineage_edge(
        &mut self,
        animal_id: AnimalId,
        ancestor_id: AnimalId,
        generation: u32,
        sequence: u32,
        side: LineageSide,
    ) -> Result<()> {
        self.snapshot.insert_lineage_edge(LineageEdge {
            animal_id,
            ancestor_id,
            generation,
            sequence,
            side,
        })
    }

    /// Record an observed trait for an animal.
    pub fn record_trait(&mut self, animal_id: AnimalId, trait_type: &str, name: &str) {
        let id = self.snapshot.next_id();
        self.snapshot
            .trait_records
            .entry(animal_id)
            .or_default()
            .push(TraitRecord {
                id,
                animal_id,
                trait_type: trait_type.to_string(),
                name: name.to_string(),
            });
    }

    /// Record a dam/sire pairing within a project.
    pub fn create_pairing(
        &mut self,
        dam_id: AnimalId,
        sire_id: AnimalId,
        project_id: ProjectId,
    ) -> PairingId {
        let id = self.snapshot.next_id();
        self.snapshot.pairings.insert(
            id,
            Pairing {
                id,
                dam_id,
                sire_id,
                project_id,
            },
        );
        id
    }
}
