use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;

use crate::error::{GeneticsError, Result};
use crate::model::LineageSide;
use crate::snapshot::SnapshotSource;
use crate::types::AnimalId;

/// One ancestor reached during a traversal, tagged with its cumulative
/// generation distance from the root and the pedigree side of the first
/// edge out of the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AncestorHop {
    pub ancestor_id: AnimalId,
    pub side: LineageSide,
    pub generation: u32,
    pub sequence: u32,
}

/// Walk all lineage edges reachable from `animal`, breadth-first and
/// generation-bounded.
///
/// The cumulative generation of a hop is the sum of edge generations along
/// the walk. A visitation set keyed by `(ancestor, cumulative generation)`
/// guarantees termination and collapses duplicate paths, so the same
/// ancestry recorded both flat (animal -> grandparent at generation 2) and
/// derived (animal -> parent -> grandparent) counts once.
///
/// Returns hops ordered by generation, then by recorded sequence. An animal
/// with no edges yields an empty vector; callers decide whether that is an
/// error.
pub fn collect_ancestors<S: SnapshotSource>(
    store: &S,
    animal: AnimalId,
    max_generations: u32,
) -> Vec<AncestorHop> {
    let mut visited: HashSet<(AnimalId, u32)> = HashSet::new();
    let mut hops: Vec<AncestorHop> = Vec::new();

    // Queue entries: (node, cumulative generation, side of the first edge).
    let mut queue: VecDeque<(AnimalId, u32, Option<LineageSide>)> = VecDeque::new();
    queue.push_back((animal, 0, None));

    while let Some((node, base_gen, side)) = queue.pop_front() {
        for edge in store.load_lineage_edges(node) {
            let generation = base_gen + edge.generation;
            if generation > max_generations {
                continue;
            }
            if !visited.insert((edge.ancestor_id, generation)) {
                continue;
            }
            let hop_side = side.unwrap_or(edge.side);
            hops.push(AncestorHop {
                ancestor_id: edge.ancestor_id,
                side: hop_side,
                generation,
                sequence: edge.sequence,
            });
            queue.push_back((edge.ancestor_id, generation, Some(hop_side)));
        }
    }

    hops.sort_by_key(|h| (h.generation, h.sequence, h.ancestor_id));
    hops
}

/// Ancestors of an animal with their recorded traits, grouped for display.
///
/// Outer key: `"{side} (Gen {generation})"`. Inner key: trait-type name,
/// mapped to the trait display names recorded for ancestors in that group.
/// Groups appear in traversal order (generation-major); ancestors without
/// recorded traits still produce their group entry.
///
/// # Errors
/// Returns `NoLineage` if the root animal has no lineage edges at all. An
/// empty result for a positive bound smaller than every recorded edge is
/// valid and returns an empty map.
pub fn ancestor_traits<S: SnapshotSource>(
    store: &S,
    animal: AnimalId,
    max_generations: u32,
) -> Result<IndexMap<String, IndexMap<String, Vec<String>>>> {
    if store.load_lineage_edges(animal).is_empty() {
        return Err(GeneticsError::NoLineage(animal));
    }

    let mut groups: IndexMap<String, IndexMap<String, Vec<String>>> = IndexMap::new();

    for hop in collect_ancestors(store, animal, max_generations) {
        let label = format!("{} (Gen {})", hop.side, hop.generation);
        let group = groups.entry(label).or_default();
        for record in store.load_animal_traits(hop.ancestor_id) {
            group
                .entry(record.trait_type.clone())
                .or_default()
                .push(record.name.clone());
        }
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::snapshot::MemorySnapshot;

    fn edge(
        reg: &mut Registry<'_>,
        animal: AnimalId,
        ancestor: AnimalId,
        generation: u32,
        sequence: u32,
        side: LineageSide,
    ) {
        reg.add_lineage_edge(animal, ancestor, generation, sequence, side)
            .unwrap();
    }

    #[test]
    fn test_collect_ancestors_flat_edges() {
        let mut snap = MemorySnapshot::new();
        let mut reg = Registry::new(&mut snap);
        edge(&mut reg, 1, 10, 1, 0, LineageSide::Maternal);
        edge(&mut reg, 1, 11, 1, 0, LineageSide::Paternal);
        edge(&mut reg, 1, 20, 2, 0, LineageSide::Maternal);

        let hops = collect_ancestors(&snap, 1, 3);
        assert_eq!(hops.len(), 3);
        assert_eq!(hops[0].generation, 1);
        assert_eq!(hops[2].ancestor_id, 20);
        assert_eq!(hops[2].generation, 2);
    }

    #[test]
    fn test_collect_ancestors_walks_derived_paths() {
        let mut snap = MemorySnapshot::new();
        let mut reg = Registry::new(&mut snap);
        // Only parent links recorded; grandparent is reached by walking.
        edge(&mut reg, 1, 10, 1, 0, LineageSide::Maternal);
        edge(&mut reg, 10, 100, 1, 0, LineageSide::Paternal);

        let hops = collect_ancestors(&snap, 1, 3);
        assert_eq!(hops.len(), 2);
        let grandparent = hops.iter().find(|h| h.ancestor_id == 100).unwrap();
        assert_eq!(grandparent.generation, 2);
        // Side stays the side of the first edge out of the root.
        assert_eq!(grandparent.side, LineageSide::Maternal);
    }

    #[test]
    fn test_collect_ancestors_generation_bound() {
        let mut snap = MemorySnapshot::new();
        let mut reg = Registry::new(&mut snap);
        edge(&mut reg, 1, 10, 1, 0, LineageSide::Maternal);
        edge(&mut reg, 10, 100, 1, 0, LineageSide::Maternal);
        edge(&mut reg, 100, 1000, 1, 0, LineageSide::Maternal);

        let hops = collect_ancestors(&snap, 1, 2);
        assert_eq!(hops.len(), 2);
        assert!(hops.iter().all(|h| h.generation <= 2));
    }

    #[test]
    fn test_duplicate_and_flat_plus_derived_edges_count_once() {
        let mut snap = MemorySnapshot::new();
        let mut reg = Registry::new(&mut snap);
        // Grandparent recorded both flat and via the parent link.
        edge(&mut reg, 1, 10, 1, 0, LineageSide::Maternal);
        edge(&mut reg, 1, 100, 2, 1, LineageSide::Maternal);
        edge(&mut reg, 10, 100, 1, 0, LineageSide::Maternal);

        let hops = collect_ancestors(&snap, 1, 4);
        let at_gen2: Vec<_> = hops
            .iter()
            .filter(|h| h.ancestor_id == 100 && h.generation == 2)
            .collect();
        assert_eq!(at_gen2.len(), 1);
    }

    #[test]
    fn test_reentrant_edges_terminate() {
        let mut snap = MemorySnapshot::new();
        let mut reg = Registry::new(&mut snap);
        // Pathological recording: 10 and 11 list each other as ancestors.
        edge(&mut reg, 1, 10, 1, 0, LineageSide::Maternal);
        edge(&mut reg, 10, 11, 1, 0, LineageSide::Maternal);
        edge(&mut reg, 11, 10, 1, 0, LineageSide::Maternal);

        let hops = collect_ancestors(&snap, 1, 6);
        // Bounded, so the walk stops; every hop respects the bound.
        assert!(hops.iter().all(|h| h.generation <= 6));
    }

    #[test]
    fn test_ancestor_traits_groups_by_label() {
        let mut snap = MemorySnapshot::new();
        let mut reg = Registry::new(&mut snap);
        edge(&mut reg, 1, 10, 1, 0, LineageSide::Maternal);
        edge(&mut reg, 1, 11, 1, 0, LineageSide::Paternal);
        reg.record_trait(10, "Coat", "Agouti");
        reg.record_trait(10, "Coat", "Rex");
        reg.record_trait(11, "Ear", "Lop");

        let groups = ancestor_traits(&snap, 1, 3).unwrap();
        let maternal = &groups["Maternal (Gen 1)"];
        assert_eq!(maternal["Coat"], vec!["Agouti", "Rex"]);
        let paternal = &groups["Paternal (Gen 1)"];
        assert_eq!(paternal["Ear"], vec!["Lop"]);
    }

    #[test]
    fn test_ancestor_traits_no_edges_is_error() {
        let snap = MemorySnapshot::new();
        let result = ancestor_traits(&snap, 42, 3);
        assert!(matches!(result, Err(GeneticsError::NoLineage(42))));
    }

    #[test]
    fn test_ancestor_traits_bound_below_all_edges_is_empty() {
        let mut snap = MemorySnapshot::new();
        let mut reg = Registry::new(&mut snap);
        edge(&mut reg, 1, 100, 2, 0, LineageSide::Maternal);

        let groups = ancestor_traits(&snap, 1, 1).unwrap();
        assert!(groups.is_empty());
    }
}
