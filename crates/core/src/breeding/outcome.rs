use indexmap::IndexMap;

use crate::model::{Allele, PossibleOffspring};
use crate::types::Scalar;

/// Floating tolerance for the probabilities-sum-to-one postcondition.
pub const PROBABILITY_TOLERANCE: Scalar = 1e-6;

/// The two alleles one parent carries at a locus.
#[derive(Debug, Clone)]
pub struct ParentalAlleles {
    pub maternal: Allele,
    pub paternal: Allele,
}

/// One locus under evaluation: the dam's and sire's allele pairs for a
/// shared gene, labelled with the trait under study.
#[derive(Debug, Clone)]
pub struct LocusCross {
    pub trait_name: String,
    pub dam: ParentalAlleles,
    pub sire: ParentalAlleles,
}

/// One merged outcome of a single-locus cross.
///
/// `alleles` is the unordered offspring pair in display order (dominant or
/// wild-type allele first). The symbol lists carry every allele each parent
/// can contribute to this outcome; for a merged heterozygote that is both
/// symbols.
#[derive(Debug, Clone)]
pub struct LocusOutcome {
    pub alleles: (Allele, Allele),
    pub probability: Scalar,
    pub maternal_symbols: Vec<String>,
    pub paternal_symbols: Vec<String>,
}

impl LocusOutcome {
    /// Display code for the offspring pair, e.g. "Aa".
    pub fn genotype_code(&self) -> String {
        format!("{}{}", self.alleles.0.symbol, self.alleles.1.symbol)
    }

    /// Whether the outcome is homozygous for the given allele.
    pub fn homozygous_for(&self, allele_id: u64) -> bool {
        self.alleles.0.id == allele_id && self.alleles.1.id == allele_id
    }
}

/// Enumerate the merged offspring outcomes for a single locus.
///
/// Each parent contributes one of its two alleles with probability 0.5,
/// independently, giving four ordered combinations at 0.25 each; ordered
/// combinations producing the same unordered pair are merged by summing
/// (Aa and aA collapse to one 0.5 outcome).
pub fn cross_locus(cross: &LocusCross) -> Vec<LocusOutcome> {
    let dam = [&cross.dam.maternal, &cross.dam.paternal];
    let sire = [&cross.sire.maternal, &cross.sire.paternal];

    let mut merged: IndexMap<(u64, u64), LocusOutcome> = IndexMap::new();

    for from_dam in dam {
        for from_sire in sire {
            let key = if from_dam.id <= from_sire.id {
                (from_dam.id, from_sire.id)
            } else {
                (from_sire.id, from_dam.id)
            };
            let entry = merged.entry(key).or_insert_with(|| LocusOutcome {
                alleles: display_order(from_dam, from_sire),
                probability: 0.0,
                maternal_symbols: Vec::new(),
                paternal_symbols: Vec::new(),
            });
            entry.probability += 0.25;
            push_unique(&mut entry.maternal_symbols, &from_dam.symbol);
            push_unique(&mut entry.paternal_symbols, &from_sire.symbol);
        }
    }

    let mut outcomes: Vec<LocusOutcome> = merged.into_values().collect();
    for outcome in &mut outcomes {
        outcome.maternal_symbols.sort();
        outcome.paternal_symbols.sort();
    }
    outcomes
}

/// Resolve the expressed phenotype of an offspring allele pair.
///
/// With exactly one wild-type allele the wild-type phenotype is expressed,
/// unless the non-wild-type allele is flagged dominant. With neither or
/// both wild-type, the pair's distinct phenotype strings are joined; a
/// homozygous pair reports its single phenotype.
pub fn resolve_phenotype(a: &Allele, b: &Allele) -> String {
    match (a.is_wild_type, b.is_wild_type) {
        (true, false) => dominance_pick(a, b),
        (false, true) => dominance_pick(b, a),
        _ => {
            if a.id == b.id || a.phenotype == b.phenotype {
                a.phenotype.clone()
            } else {
                let (first, second) = display_order(a, b);
                format!("{} / {}", first.phenotype, second.phenotype)
            }
        }
    }
}

fn dominance_pick(wild: &Allele, other: &Allele) -> String {
    if other.is_dominant {
        other.phenotype.clone()
    } else {
        wild.phenotype.clone()
    }
}

/// Full offspring distribution across one or more independent loci.
///
/// Per-locus distributions are combined as a Cartesian product with
/// probability multiplication; product rows with identical combined
/// genotype descriptions are merged by summing. The returned probabilities
/// sum to 1.0 within [`PROBABILITY_TOLERANCE`] for any non-empty input.
pub fn offspring_probabilities(loci: &[LocusCross]) -> Vec<PossibleOffspring> {
    if loci.is_empty() {
        return Vec::new();
    }

    // Seed with one empty row, then extend locus by locus.
    let mut rows: Vec<PossibleOffspring> = vec![PossibleOffspring {
        probability: 1.0,
        phenotype: String::new(),
        genotype_description: String::new(),
        maternal_alleles: Vec::new(),
        paternal_alleles: Vec::new(),
    }];

    for cross in loci {
        let outcomes = cross_locus(cross);
        let mut next = Vec::with_capacity(rows.len() * outcomes.len());
        for row in &rows {
            for outcome in &outcomes {
                let phenotype = resolve_phenotype(&outcome.alleles.0, &outcome.alleles.1);
                next.push(PossibleOffspring {
                    probability: row.probability * outcome.probability,
                    phenotype: join_segment(&row.phenotype, &phenotype, "; "),
                    genotype_description: join_segment(
                        &row.genotype_description,
                        &outcome.genotype_code(),
                        " ",
                    ),
                    maternal_alleles: append_segment(
                        &row.maternal_alleles,
                        &outcome.maternal_symbols,
                    ),
                    paternal_alleles: append_segment(
                        &row.paternal_alleles,
                        &outcome.paternal_symbols,
                    ),
                });
            }
        }
        rows = next;
    }

    // Merge rows with identical combined genotype descriptions.
    let mut merged: IndexMap<String, PossibleOffspring> = IndexMap::new();
    for row in rows {
        match merged.get_mut(&row.genotype_description) {
            Some(existing) => existing.probability += row.probability,
            None => {
                merged.insert(row.genotype_description.clone(), row);
            }
        }
    }
    let result: Vec<PossibleOffspring> = merged.into_values().collect();

    debug_assert!(
        (result.iter().map(|r| r.probability).sum::<Scalar>() - 1.0).abs()
            < PROBABILITY_TOLERANCE
    );
    result
}

/// Marginal phenotype probabilities per locus, keyed
/// `"{trait}: {phenotype}"`. Each locus's entries sum to 1.
pub fn trait_probabilities(loci: &[LocusCross]) -> IndexMap<String, Scalar> {
    let mut map: IndexMap<String, Scalar> = IndexMap::new();
    for cross in loci {
        for outcome in cross_locus(cross) {
            let phenotype = resolve_phenotype(&outcome.alleles.0, &outcome.alleles.1);
            let key = format!("{}: {}", cross.trait_name, phenotype);
            *map.entry(key).or_insert(0.0) += outcome.probability;
        }
    }
    map
}

/// Display order for an offspring pair: dominant allele first, then
/// wild-type, then by symbol.
fn display_order(a: &Allele, b: &Allele) -> (Allele, Allele) {
    let rank = |x: &Allele| {
        if x.is_dominant && !x.is_wild_type {
            0
        } else if x.is_wild_type {
            1
        } else {
            2
        }
    };
    if (rank(a), &a.symbol) <= (rank(b), &b.symbol) {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

fn push_unique(symbols: &mut Vec<String>, symbol: &str) {
    if !symbols.iter().any(|s| s == symbol) {
        symbols.push(symbol.to_string());
    }
}

fn join_segment(base: &str, segment: &str, sep: &str) -> String {
    if base.is_empty() {
        segment.to_string()
    } else {
        format!("{}{}{}", base, sep, segment)
    }
}

fn append_segment(base: &[String], symbols: &[String]) -> Vec<String> {
    let mut out = base.to_vec();
    out.push(symbols.join("/"));
    out
}
