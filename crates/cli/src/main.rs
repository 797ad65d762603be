use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use breeding_genetics_core as core;
use core::breeding::{BreedingRisk, CompatibilityConfig};
use core::engine::BreedingEngine;
use core::model::{GeneCategory, ImpactLevel, InheritancePattern, Sex};
use core::registry::Registry;
use core::snapshot::MemorySnapshot;

mod alleles;

use alleles::AlleleSheet;

#[derive(Parser)]
#[command(name = "breedcalc")]
#[command(version)]
#[command(about = "Pedigree and Mendelian-inheritance calculations for breeding records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the inbreeding coefficient for a prospective pairing
    Inbreeding {
        /// Path to lineage CSV (columns: animal, ancestor, generation, side[, sequence])
        #[arg(short, long)]
        lineage: String,

        /// Dam animal id
        #[arg(long)]
        dam: u64,

        /// Sire animal id
        #[arg(long)]
        sire: u64,

        /// Output format: "text" (default) or "json"
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List an animal's ancestors with their recorded traits
    Ancestors {
        /// Path to lineage CSV
        #[arg(short, long)]
        lineage: String,

        /// Path to trait CSV (columns: animal, trait_type, name)
        #[arg(short, long)]
        traits: Option<String>,

        /// Animal id to start from
        #[arg(long)]
        animal: u64,

        /// Maximum generation depth
        #[arg(long, default_value = "4")]
        max_gen: u32,

        /// Output format: "text" (default) or "json"
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Enumerate offspring genotype/phenotype probabilities for a cross
    Cross {
        /// Path to allele CSV (columns: trait, symbol, wild_type, dominant, phenotype, risk)
        #[arg(short, long)]
        alleles: String,

        /// Locus spec "<trait>=<damM>/<damP>:<sireM>/<sireP>", repeatable
        #[arg(long)]
        locus: Vec<String>,

        /// Output format: "text" (default) or "json"
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate a prospective dam/sire pairing
    Validate {
        /// Path to animal CSV (columns: animal, name, sex, species)
        #[arg(short, long)]
        animals: String,

        /// Path to lineage CSV
        #[arg(short, long)]
        lineage: Option<String>,

        /// Dam animal id
        #[arg(long)]
        dam: u64,

        /// Sire animal id
        #[arg(long)]
        sire: u64,

        /// Inbreeding-coefficient risk threshold
        #[arg(long, default_value = "0.125")]
        threshold: f64,

        /// Output format: "text" (default) or "json"
        #[arg(long, default_value = "text")]
        format: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Inbreeding {
            lineage,
            dam,
            sire,
            format,
        } => cmd_inbreeding(&lineage, dam, sire, &format),
        Commands::Ancestors {
            lineage,
            traits,
            animal,
            max_gen,
            format,
        } => cmd_ancestors(&lineage, traits.as_deref(), animal, max_gen, &format),
        Commands::Cross {
            alleles,
            locus,
            format,
        } => cmd_cross(&alleles, &locus, &format),
        Commands::Validate {
            animals,
            lineage,
            dam,
            sire,
            threshold,
            format,
        } => cmd_validate(&animals, lineage.as_deref(), dam, sire, threshold, &format),
    }
}

fn cmd_inbreeding(lineage_path: &str, dam: u64, sire: u64, format: &str) -> Result<()> {
    let mut snap = MemorySnapshot::new();
    let n = snap
        .lineage_from_csv(lineage_path)
        .with_context(|| format!("Failed to load lineage from '{}'", lineage_path))?;
    eprintln!("Loaded {} lineage edges from '{}'", n, lineage_path);

    let engine = BreedingEngine::new(&snap);
    let coefficient = engine.inbreeding_coefficient(dam, sire)?;

    match format.to_lowercase().as_str() {
        "json" => {
            let mut map = serde_json::Map::new();
            map.insert("dam".to_string(), serde_json::json!(dam));
            map.insert("sire".to_string(), serde_json::json!(sire));
            map.insert("coefficient".to_string(), serde_json::json!(coefficient));
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        _ => {
            println!(
                "Inbreeding coefficient for {} x {}: {:.6}",
                dam, sire, coefficient
            );
        }
    }
    Ok(())
}

fn cmd_ancestors(
    lineage_path: &str,
    traits_path: Option<&str>,
    animal: u64,
    max_gen: u32,
    format: &str,
) -> Result<()> {
    let mut snap = MemorySnapshot::new();
    snap.lineage_from_csv(lineage_path)
        .with_context(|| format!("Failed to load lineage from '{}'", lineage_path))?;
    if let Some(path) = traits_path {
        let n = snap
            .traits_from_csv(path)
            .with_context(|| format!("Failed to load traits from '{}'", path))?;
        eprintln!("Loaded {} trait records from '{}'", n, path);
    }

    let engine = BreedingEngine::new(&snap);
    let groups = engine.ancestor_traits(animal, max_gen)?;

    match format.to_lowercase().as_str() {
        "json" => {
            let mut map = serde_json::Map::new();
            for (label, traits) in &groups {
                let mut inner = serde_json::Map::new();
                for (trait_type, names) in traits {
                    inner.insert(trait_type.clone(), serde_json::json!(names));
                }
                map.insert(label.clone(), serde_json::Value::Object(inner));
            }
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        _ => {
            for (label, traits) in &groups {
                println!("{}", label);
                if traits.is_empty() {
                    println!("  (no recorded traits)");
                }
                for (trait_type, names) in traits {
                    println!("  {}: {}", trait_type, names.join(", "));
                }
            }
        }
    }
    Ok(())
}

fn cmd_cross(alleles_path: &str, locus_specs: &[String], format: &str) -> Result<()> {
    if locus_specs.is_empty() {
        bail!("At least one --locus spec is required");
    }

    let sheet = AlleleSheet::from_csv(alleles_path)
        .with_context(|| format!("Failed to load alleles from '{}'", alleles_path))?;

    // Build an in-memory snapshot with two synthetic parents (dam=1, sire=2)
    // so the cross runs through the same registry checks as recorded data.
    let mut snap = MemorySnapshot::new();
    let mut reg = Registry::new(&mut snap);
    reg.register_animal(1, "dam", Sex::Female, 1)?;
    reg.register_animal(2, "sire", Sex::Male, 1)?;

    for (index, spec) in locus_specs.iter().enumerate() {
        let parsed = parse_locus_spec(spec)?;
        let trait_alleles = sheet
            .trait_alleles(&parsed.trait_name)
            .with_context(|| format!("No alleles defined for trait '{}'", parsed.trait_name))?;

        let chromosome =
            reg.create_chromosome(&format!("Chr{}", index + 1), (index + 1) as u32, 1)?;
        let pair =
            reg.create_chromosome_pair(chromosome, chromosome, InheritancePattern::Autosomal)?;
        let gene = reg.create_gene(
            pair,
            &parsed.trait_name,
            1,
            GeneCategory::Other,
            ImpactLevel::Minor,
        )?;

        let mut ids = HashMap::new();
        for def in trait_alleles {
            let id = reg.create_allele(
                gene,
                &def.symbol,
                def.wild_type,
                def.dominant,
                &def.phenotype,
                def.risk,
            )?;
            ids.insert(def.symbol.clone(), id);
        }

        let trait_id = (index + 1) as u64;
        reg.assign_genotype(
            1,
            pair,
            lookup_allele(&ids, &parsed.dam_maternal, &parsed.trait_name)?,
            lookup_allele(&ids, &parsed.dam_paternal, &parsed.trait_name)?,
            trait_id,
            &format!("{}{}", parsed.dam_maternal, parsed.dam_paternal),
        )?;
        reg.assign_genotype(
            2,
            pair,
            lookup_allele(&ids, &parsed.sire_maternal, &parsed.trait_name)?,
            lookup_allele(&ids, &parsed.sire_paternal, &parsed.trait_name)?,
            trait_id,
            &format!("{}{}", parsed.sire_maternal, parsed.sire_paternal),
        )?;
    }

    let mut reg = Registry::new(&mut snap);
    let pairing = reg.create_pairing(1, 2, 1);

    let engine = BreedingEngine::new(&snap);
    let calculation = engine.create_breeding_calculation(pairing)?;
    let rows = engine.offspring_probabilities(&calculation)?;
    let traits = engine.trait_probabilities(&calculation)?;

    match format.to_lowercase().as_str() {
        "json" => {
            let offspring: Vec<serde_json::Value> = rows
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "probability": r.probability,
                        "genotype": r.genotype_description,
                        "phenotype": r.phenotype,
                        "maternal_alleles": r.maternal_alleles,
                        "paternal_alleles": r.paternal_alleles,
                    })
                })
                .collect();
            let mut trait_map = serde_json::Map::new();
            for (name, p) in &traits {
                trait_map.insert(name.clone(), serde_json::json!(p));
            }
            let mut map = serde_json::Map::new();
            map.insert("offspring".to_string(), serde_json::json!(offspring));
            map.insert(
                "trait_probabilities".to_string(),
                serde_json::Value::Object(trait_map),
            );
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        _ => {
            println!("{:<10} {:<16} phenotype", "prob", "genotype");
            for row in &rows {
                println!(
                    "{:<10.4} {:<16} {}",
                    row.probability, row.genotype_description, row.phenotype
                );
            }
            println!();
            println!("Trait probabilities:");
            for (name, p) in &traits {
                println!("  {:<30} {:.4}", name, p);
            }
        }
    }
    Ok(())
}

fn cmd_validate(
    animals_path: &str,
    lineage_path: Option<&str>,
    dam: u64,
    sire: u64,
    threshold: f64,
    format: &str,
) -> Result<()> {
    let mut snap = MemorySnapshot::new();
    snap.animals_from_csv(animals_path)
        .with_context(|| format!("Failed to load animals from '{}'", animals_path))?;
    if let Some(path) = lineage_path {
        snap.lineage_from_csv(path)
            .with_context(|| format!("Failed to load lineage from '{}'", path))?;
    }

    let engine = BreedingEngine::new(&snap).with_config(CompatibilityConfig {
        inbreeding_threshold: threshold,
    });
    let result = engine.validate_breeding_pair(dam, sire)?;

    match format.to_lowercase().as_str() {
        "json" => {
            let risks: Vec<serde_json::Value> = result
                .risks
                .iter()
                .map(|risk| match risk {
                    BreedingRisk::Inbreeding {
                        coefficient,
                        threshold,
                    } => serde_json::json!({
                        "kind": "inbreeding",
                        "coefficient": coefficient,
                        "threshold": threshold,
                    }),
                    BreedingRisk::Inheritance(r) => serde_json::json!({
                        "kind": "inheritance",
                        "trait": r.trait_name,
                        "gene": r.gene_name,
                        "allele": r.allele_symbol,
                        "risk_level": r.risk_level.to_string(),
                        "probability": r.probability,
                    }),
                })
                .collect();
            let mut map = serde_json::Map::new();
            map.insert(
                "is_compatible".to_string(),
                serde_json::Value::Bool(result.is_compatible),
            );
            map.insert(
                "inbreeding_coefficient".to_string(),
                serde_json::json!(result.inbreeding_coefficient),
            );
            map.insert("warnings".to_string(), serde_json::json!(result.warnings));
            map.insert("risks".to_string(), serde_json::json!(risks));
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        _ => {
            println!(
                "Pairing {} x {}: {}",
                dam,
                sire,
                if result.is_compatible {
                    "compatible"
                } else {
                    "NOT compatible"
                }
            );
            println!(
                "Inbreeding coefficient: {:.6}",
                result.inbreeding_coefficient
            );
            for warning in &result.warnings {
                println!("  warning: {}", warning);
            }
            for risk in &result.risks {
                match risk {
                    BreedingRisk::Inbreeding {
                        coefficient,
                        threshold,
                    } => println!(
                        "  risk: inbreeding coefficient {:.4} exceeds threshold {:.4}",
                        coefficient, threshold
                    ),
                    BreedingRisk::Inheritance(r) => println!(
                        "  risk: shared '{}' allele on {} ({} risk, {:.1}% affected offspring)",
                        r.allele_symbol,
                        r.gene_name,
                        r.risk_level,
                        r.probability * 100.0
                    ),
                }
            }
        }
    }
    Ok(())
}

struct LocusSpec {
    trait_name: String,
    dam_maternal: String,
    dam_paternal: String,
    sire_maternal: String,
    sire_paternal: String,
}

/// Parse "<trait>=<damM>/<damP>:<sireM>/<sireP>".
fn parse_locus_spec(spec: &str) -> Result<LocusSpec> {
    let (trait_name, rest) = spec
        .split_once('=')
        .with_context(|| format!("Locus spec '{}' is missing '='", spec))?;
    let (dam, sire) = rest
        .split_once(':')
        .with_context(|| format!("Locus spec '{}' is missing ':'", spec))?;
    let (dam_m, dam_p) = dam
        .split_once('/')
        .with_context(|| format!("Dam genotype '{}' is missing '/'", dam))?;
    let (sire_m, sire_p) = sire
        .split_once('/')
        .with_context(|| format!("Sire genotype '{}' is missing '/'", sire))?;

    Ok(LocusSpec {
        trait_name: trait_name.trim().to_string(),
        dam_maternal: dam_m.trim().to_string(),
        dam_paternal: dam_p.trim().to_string(),
        sire_maternal: sire_m.trim().to_string(),
        sire_paternal: sire_p.trim().to_string(),
    })
}

fn lookup_allele(ids: &HashMap<String, u64>, symbol: &str, trait_name: &str) -> Result<u64> {
    ids.get(symbol).copied().with_context(|| {
        format!(
            "Allele '{}' is not defined for trait '{}'",
            symbol, trait_name
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locus_spec() {
        let spec = parse_locus_spec("Coat=A/a:A/a").unwrap();
        assert_eq!(spec.trait_name, "Coat");
        assert_eq!(spec.dam_maternal, "A");
        assert_eq!(spec.dam_paternal, "a");
        assert_eq!(spec.sire_maternal, "A");
        assert_eq!(spec.sire_paternal, "a");
    }

    #[test]
    fn test_parse_locus_spec_with_spaces() {
        let spec = parse_locus_spec("Fur = + / rx : rx / rx").unwrap();
        assert_eq!(spec.trait_name, "Fur");
        assert_eq!(spec.dam_paternal, "rx");
        assert_eq!(spec.sire_maternal, "rx");
    }

    #[test]
    fn test_parse_locus_spec_rejects_malformed() {
        assert!(parse_locus_spec("Coat").is_err());
        assert!(parse_locus_spec("Coat=A/a").is_err());
        assert!(parse_locus_spec("Coat=Aa:Aa").is_err());
    }
}
