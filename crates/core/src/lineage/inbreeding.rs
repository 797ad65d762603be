use std::collections::HashMap;

use crate::error::Result;
use crate::snapshot::SnapshotSource;
use crate::types::{AnimalId, Scalar};

use super::traversal::collect_ancestors;

/// Depth cap for the "full reachable ancestor set". A common-ancestor term
/// at this depth contributes at most 0.5^33, far below any reported
/// precision, and the cap keeps re-entrant edge data finite.
const MAX_COEFFICIENT_DEPTH: u32 = 16;

/// Inbreeding coefficient of a prospective dam/sire pairing.
///
/// For every ancestor common to both parents, each pair of recorded
/// generation distances contributes `0.5^(g_dam + g_sire + 1)`; distinct
/// paths from the same parent each contribute their own term. This is the
/// simplified Wright's variant without the `(1 + F_ancestor)` weighting for
/// the common ancestor's own inbreeding.
///
/// No common ancestors, or a parent with no recorded edges, gives 0.0 —
/// "no known relatedness" is a valid domain state, not an error. Symmetric
/// in (dam, sire) by construction.
pub fn inbreeding_coefficient<S: SnapshotSource>(
    store: &S,
    dam: AnimalId,
    sire: AnimalId,
) -> Result<Scalar> {
    let dam_gens = ancestor_generations(store, dam);
    let sire_gens = ancestor_generations(store, sire);

    let mut coefficient = 0.0;
    for (ancestor, g_dams) in &dam_gens {
        if let Some(g_sires) = sire_gens.get(ancestor) {
            for &g_dam in g_dams {
                for &g_sire in g_sires {
                    coefficient += 0.5f64.powi((g_dam + g_sire + 1) as i32);
                }
            }
        }
    }

    Ok(coefficient.min(1.0))
}

/// Reachable ancestors of one parent, keyed by ancestor id, with every
/// distinct generation distance at which the ancestor is reached.
fn ancestor_generations<S: SnapshotSource>(
    store: &S,
    animal: AnimalId,
) -> HashMap<AnimalId, Vec<u32>> {
    let mut map: HashMap<AnimalId, Vec<u32>> = HashMap::new();
    for hop in collect_ancestors(store, animal, MAX_COEFFICIENT_DEPTH) {
        map.entry(hop.ancestor_id).or_default().push(hop.generation);
    }
    map
}
