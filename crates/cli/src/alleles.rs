use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

use breeding_genetics_core::model::RiskLevel;

/// One allele definition from the CLI's allele sheet.
#[derive(Debug, Clone)]
pub struct AlleleDef {
    pub symbol: String,
    pub wild_type: bool,
    pub dominant: bool,
    pub phenotype: String,
    pub risk: RiskLevel,
}

/// Allele definitions grouped by trait, loaded from a CSV sheet.
///
/// Expected columns (header required): `trait`, `symbol`, `wild_type`,
/// `dominant`, `phenotype`, `risk`. Boolean columns accept 1/0, true/false,
/// yes/no.
#[derive(Debug, Clone)]
pub struct AlleleSheet {
    by_trait: HashMap<String, Vec<AlleleDef>>,
}

impl AlleleSheet {
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path.as_ref())?;

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.to_lowercase())
            .collect();

        let col = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .with_context(|| format!("Allele CSV missing '{}' column", name))
        };
        let trait_col = col("trait")?;
        let symbol_col = col("symbol")?;
        let wild_col = col("wild_type")?;
        let dominant_col = col("dominant")?;
        let phenotype_col = col("phenotype")?;
        let risk_col = col("risk")?;

        let mut by_trait: HashMap<String, Vec<AlleleDef>> = HashMap::new();
        for (row, result) in reader.records().enumerate() {
            let record = result?;
            let field = |idx: usize| -> Result<&str> {
                record
                    .get(idx)
                    .with_context(|| format!("Missing field in allele row {}", row + 1))
            };

            let trait_name = field(trait_col)?.to_string();
            let def = AlleleDef {
                symbol: field(symbol_col)?.to_string(),
                wild_type: parse_flag(field(wild_col)?),
                dominant: parse_flag(field(dominant_col)?),
                phenotype: field(phenotype_col)?.to_string(),
                risk: field(risk_col)?
                    .parse::<RiskLevel>()
                    .with_context(|| format!("Bad risk level in allele row {}", row + 1))?,
            };
            by_trait.entry(trait_name).or_default().push(def);
        }

        Ok(Self { by_trait })
    }

    pub fn trait_alleles(&self, trait_name: &str) -> Option<&[AlleleDef]> {
        self.by_trait.get(trait_name).map(Vec::as_slice)
    }
}

fn parse_flag(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_csv(content: &str) -> String {
        let dir = std::env::temp_dir();
        let file_name = format!("test_alleles_{}.csv", std::process::id());
        let path = dir.join(file_name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_sheet_groups_by_trait() {
        let csv = "trait,symbol,wild_type,dominant,phenotype,risk\n\
                   Coat,A,1,0,Agouti,none\n\
                   Coat,a,0,0,Self,low\n\
                   Fur,+,yes,no,Normal,none\n";
        let path = write_temp_csv(csv);
        let sheet = AlleleSheet::from_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let coat = sheet.trait_alleles("Coat").unwrap();
        assert_eq!(coat.len(), 2);
        assert!(coat[0].wild_type);
        assert!(!coat[1].wild_type);
        assert_eq!(coat[1].risk, RiskLevel::Low);
        assert!(sheet.trait_alleles("Ear").is_none());
    }

    #[test]
    fn test_parse_flag_variants() {
        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("Yes"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("no"));
    }
}
