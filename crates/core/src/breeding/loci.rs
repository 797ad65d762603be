use crate::error::Result;
use crate::snapshot::SnapshotSource;
use crate::types::AnimalId;

use super::outcome::{LocusCross, ParentalAlleles};

/// Build the loci a breeding pair can be evaluated on: every
/// (chromosome pair, trait) where both parents have a recorded genotype.
///
/// Loci are returned in the order of the dam's genotype records. An empty
/// result means the parents share no evaluable locus, which is a valid
/// domain state.
pub fn shared_locus_crosses<S: SnapshotSource>(
    store: &S,
    dam: AnimalId,
    sire: AnimalId,
) -> Result<Vec<LocusCross>> {
    let dam_genotypes = store.load_genotypes(dam, None);
    let sire_genotypes = store.load_genotypes(sire, None);

    let mut loci = Vec::new();
    for dam_gt in &dam_genotypes {
        let sire_gt = sire_genotypes.iter().find(|g| {
            g.chromosome_pair_id == dam_gt.chromosome_pair_id && g.trait_id == dam_gt.trait_id
        });
        let Some(sire_gt) = sire_gt else {
            continue;
        };

        let dam_maternal = store.load_allele(dam_gt.maternal_allele_id)?;
        let dam_paternal = store.load_allele(dam_gt.paternal_allele_id)?;
        let sire_maternal = store.load_allele(sire_gt.maternal_allele_id)?;
        let sire_paternal = store.load_allele(sire_gt.paternal_allele_id)?;
        let gene = store.load_gene(dam_maternal.gene_id)?;

        loci.push(LocusCross {
            trait_name: gene.name.clone(),
            dam: ParentalAlleles {
                maternal: dam_maternal.clone(),
                paternal: dam_paternal.clone(),
            },
            sire: ParentalAlleles {
                maternal: sire_maternal.clone(),
                paternal: sire_paternal.clone(),
            },
        });
    }

    Ok(loci)
}
