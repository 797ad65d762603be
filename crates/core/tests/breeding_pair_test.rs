//! Integration test: a full breeding-pair evaluation from registry setup
//! to compatibility verdict.
//!
//! Scenario: two rabbits heterozygous at two loci.
//!   ASIP (coat): A (wild, agouti) / a (recessive, self) — cosmetic.
//!   MLPH (health): D (wild, normal) / d (recessive, dilution syndrome,
//!   high risk) — both parents carriers.

use approx::assert_relative_eq;
use breeding_genetics_core::breeding::{BreedingRisk, PROBABILITY_TOLERANCE};
use breeding_genetics_core::engine::BreedingEngine;
use breeding_genetics_core::model::{
    GeneCategory, ImpactLevel, InheritancePattern, RiskLevel, Sex,
};
use breeding_genetics_core::registry::Registry;
use breeding_genetics_core::snapshot::MemorySnapshot;
use breeding_genetics_core::types::PairingId;

fn build_snapshot() -> (MemorySnapshot, PairingId) {
    let mut snap = MemorySnapshot::new();
    let mut reg = Registry::new(&mut snap);

    reg.register_animal(1, "Clover", Sex::Female, 5).unwrap();
    reg.register_animal(2, "Basil", Sex::Male, 5).unwrap();

    let chr1 = reg.create_chromosome("Chr1", 1, 5).unwrap();
    let pair1 = reg
        .create_chromosome_pair(chr1, chr1, InheritancePattern::Autosomal)
        .unwrap();
    let asip = reg
        .create_gene(pair1, "ASIP", 2, GeneCategory::Coat, ImpactLevel::Cosmetic)
        .unwrap();
    let big_a = reg
        .create_allele(asip, "A", true, false, "Agouti", RiskLevel::None)
        .unwrap();
    let small_a = reg
        .create_allele(asip, "a", false, false, "Self", RiskLevel::Low)
        .unwrap();

    let chr4 = reg.create_chromosome("Chr4", 4, 5).unwrap();
    let pair4 = reg
        .create_chromosome_pair(chr4, chr4, InheritancePattern::Autosomal)
        .unwrap();
    let mlph = reg
        .create_gene(pair4, "MLPH", 7, GeneCategory::Health, ImpactLevel::Major)
        .unwrap();
    let big_d = reg
        .create_allele(mlph, "D", true, false, "Normal", RiskLevel::None)
        .unwrap();
    let small_d = reg
        .create_allele(mlph, "d", false, false, "Dilution syndrome", RiskLevel::High)
        .unwrap();

    for animal in [1, 2] {
        reg.assign_genotype(animal, pair1, big_a, small_a, 70, "Aa")
            .unwrap();
        reg.assign_genotype(animal, pair4, big_d, small_d, 71, "Dd")
            .unwrap();
    }

    let pairing = reg.create_pairing(1, 2, 9);
    (snap, pairing)
}

#[test]
fn test_two_locus_distribution() {
    let (snap, pairing) = build_snapshot();
    let engine = BreedingEngine::new(&snap);
    let calc = engine.create_breeding_calculation(pairing).unwrap();

    let rows = engine.offspring_probabilities(&calc).unwrap();

    // 3 merged outcomes per locus, 9 combined rows.
    assert_eq!(rows.len(), 9);

    let total: f64 = rows.iter().map(|r| r.probability).sum();
    assert_relative_eq!(total, 1.0, epsilon = PROBABILITY_TOLERANCE);

    // The double-carrier row: Aa at 0.5 times Dd at 0.5.
    let double_het = rows
        .iter()
        .find(|r| r.genotype_description == "Aa Dd")
        .expect("missing Aa Dd row");
    assert_relative_eq!(double_het.probability, 0.25);
    assert_eq!(double_het.phenotype, "Agouti; Normal");

    // The affected row: homozygous d.
    let affected = rows
        .iter()
        .find(|r| r.genotype_description == "aa dd")
        .expect("missing aa dd row");
    assert_relative_eq!(affected.probability, 0.0625);
    assert_eq!(affected.phenotype, "Self; Dilution syndrome");
}

#[test]
fn test_trait_probabilities_marginals() {
    let (snap, pairing) = build_snapshot();
    let engine = BreedingEngine::new(&snap);
    let calc = engine.create_breeding_calculation(pairing).unwrap();

    let probs = engine.trait_probabilities(&calc).unwrap();
    assert_relative_eq!(probs["ASIP: Agouti"], 0.75);
    assert_relative_eq!(probs["ASIP: Self"], 0.25);
    assert_relative_eq!(probs["MLPH: Normal"], 0.75);
    assert_relative_eq!(probs["MLPH: Dilution syndrome"], 0.25);
}

#[test]
fn test_genetic_risk_analysis_flags_shared_carrier_allele() {
    let (snap, pairing) = build_snapshot();
    let engine = BreedingEngine::new(&snap);
    let calc = engine.create_breeding_calculation(pairing).unwrap();

    let risks = engine.analyze_genetic_risks(&calc).unwrap();
    // Only 'd' qualifies: 'a' is shared but low-risk.
    assert_eq!(risks.len(), 1);
    assert_eq!(risks[0].gene_name, "MLPH");
    assert_eq!(risks[0].allele_symbol, "d");
    assert_relative_eq!(risks[0].probability, 0.25);
}

#[test]
fn test_validation_verdict_for_carrier_pair() {
    let (snap, _) = build_snapshot();
    let engine = BreedingEngine::new(&snap);

    let result = engine.validate_breeding_pair(1, 2).unwrap();
    assert!(result.is_compatible);
    assert!(result.warnings.is_empty());
    assert!(result
        .risks
        .iter()
        .any(|r| matches!(r, BreedingRisk::Inheritance(risk) if risk.allele_symbol == "d")));
}

#[test]
fn test_self_pairing_is_incompatible() {
    let (snap, _) = build_snapshot();
    let engine = BreedingEngine::new(&snap);

    let result = engine.validate_breeding_pair(1, 1).unwrap();
    assert!(!result.is_compatible);
}

#[test]
fn test_recompute_creates_fresh_calculation() {
    let (snap, pairing) = build_snapshot();
    let engine = BreedingEngine::new(&snap);

    let first = engine.create_breeding_calculation(pairing).unwrap();
    let second = engine.create_breeding_calculation(pairing).unwrap();
    assert_ne!(first.id, second.id);

    // Same snapshot, same distribution.
    let a = engine.offspring_probabilities(&first).unwrap();
    let b = engine.offspring_probabilities(&second).unwrap();
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.genotype_description, y.genotype_description);
        assert_relative_eq!(x.probability, y.probability);
    }
}
