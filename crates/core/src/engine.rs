use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use indexmap::IndexMap;

use crate::breeding::{
    self, BreedingCompatibilityResult, CompatibilityConfig, InheritanceRisk,
};
use crate::error::Result;
use crate::lineage;
use crate::model::{BreedingCalculation, PossibleOffspring};
use crate::snapshot::SnapshotSource;
use crate::types::{AnimalId, PairingId, Scalar};

/// Facade over the calculation engine for one snapshot.
///
/// The engine is a pure function of the snapshot it wraps; independent
/// engines (or the same engine from several threads) may run concurrently.
/// Persisting the calculations it creates is the collaborator's job.
pub struct BreedingEngine<'s, S: SnapshotSource> {
    store: &'s S,
    config: CompatibilityConfig,
    next_calculation: AtomicU64,
}

impl<'s, S: SnapshotSource> BreedingEngine<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            config: CompatibilityConfig::default(),
            next_calculation: AtomicU64::new(1),
        }
    }

    /// Replace the default compatibility thresholds.
    pub fn with_config(mut self, config: CompatibilityConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CompatibilityConfig {
        &self.config
    }

    /// Relatedness of a prospective pairing, in `[0, 1]`.
    pub fn inbreeding_coefficient(&self, dam: AnimalId, sire: AnimalId) -> Result<Scalar> {
        lineage::inbreeding_coefficient(self.store, dam, sire)
    }

    /// Ancestors of an animal with their recorded traits, grouped by
    /// `"{side} (Gen {n})"` and trait type.
    pub fn ancestor_traits(
        &self,
        animal: AnimalId,
        max_generations: u32,
    ) -> Result<IndexMap<String, IndexMap<String, Vec<String>>>> {
        lineage::ancestor_traits(self.store, animal, max_generations)
    }

    /// Start an evaluation run for a recorded pairing.
    ///
    /// Each call creates a fresh calculation; recomputation never mutates
    /// an earlier one.
    pub fn create_breeding_calculation(
        &self,
        pairing_id: PairingId,
    ) -> Result<BreedingCalculation> {
        let pairing = self.store.load_pairing(pairing_id)?;
        Ok(BreedingCalculation {
            id: self.next_calculation.fetch_add(1, Ordering::Relaxed),
            pairing_id,
            dam_id: pairing.dam_id,
            sire_id: pairing.sire_id,
            created_at: SystemTime::now(),
        })
    }

    /// Offspring genotype/phenotype distribution across every locus both
    /// parents have a recorded genotype for. Empty when the parents share
    /// no evaluable locus.
    pub fn offspring_probabilities(
        &self,
        calculation: &BreedingCalculation,
    ) -> Result<Vec<PossibleOffspring>> {
        let loci =
            breeding::shared_locus_crosses(self.store, calculation.dam_id, calculation.sire_id)?;
        Ok(breeding::offspring_probabilities(&loci))
    }

    /// Marginal phenotype probabilities per trait for a calculation.
    pub fn trait_probabilities(
        &self,
        calculation: &BreedingCalculation,
    ) -> Result<IndexMap<String, Scalar>> {
        let loci =
            breeding::shared_locus_crosses(self.store, calculation.dam_id, calculation.sire_id)?;
        Ok(breeding::trait_probabilities(&loci))
    }

    /// Full compatibility verdict for a prospective pairing.
    pub fn validate_breeding_pair(
        &self,
        dam: AnimalId,
        sire: AnimalId,
    ) -> Result<BreedingCompatibilityResult> {
        breeding::validate_breeding_pair(self.store, &self.config, dam, sire)
    }

    /// Shared deleterious alleles for a calculation's pairing.
    pub fn analyze_genetic_risks(
        &self,
        calculation: &BreedingCalculation,
    ) -> Result<Vec<InheritanceRisk>> {
        breeding::analyze_genetic_risks(self.store, calculation.dam_id, calculation.sire_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sex;
    use crate::registry::Registry;
    use crate::snapshot::MemorySnapshot;

    #[test]
    fn test_calculations_get_distinct_ids() {
        let mut snap = MemorySnapshot::new();
        let mut reg = Registry::new(&mut snap);
        reg.register_animal(1, "Clover", Sex::Female, 5).unwrap();
        reg.register_animal(2, "Basil", Sex::Male, 5).unwrap();
        let pairing = reg.create_pairing(1, 2, 9);

        let engine = BreedingEngine::new(&snap);
        let first = engine.create_breeding_calculation(pairing).unwrap();
        let second = engine.create_breeding_calculation(pairing).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(first.dam_id, 1);
        assert_eq!(first.sire_id, 2);
    }

    #[test]
    fn test_unknown_pairing_is_not_found() {
        let snap = MemorySnapshot::new();
        let engine = BreedingEngine::new(&snap);
        assert!(engine.create_breeding_calculation(42).is_err());
    }

    #[test]
    fn test_no_shared_loci_yields_empty_distribution() {
        let mut snap = MemorySnapshot::new();
        let mut reg = Registry::new(&mut snap);
        reg.register_animal(1, "Clover", Sex::Female, 5).unwrap();
        reg.register_animal(2, "Basil", Sex::Male, 5).unwrap();
        let pairing = reg.create_pairing(1, 2, 9);

        let engine = BreedingEngine::new(&snap);
        let calc = engine.create_breeding_calculation(pairing).unwrap();
        assert!(engine.offspring_probabilities(&calc).unwrap().is_empty());
        assert!(engine.trait_probabilities(&calc).unwrap().is_empty());
        assert!(engine.analyze_genetic_risks(&calc).unwrap().is_empty());
    }
}
