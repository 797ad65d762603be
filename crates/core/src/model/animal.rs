use std::fmt;
use std::str::FromStr;

use crate::error::GeneticsError;
use crate::types::{AnimalId, PairingId, ProjectId, SpeciesId, TraitRecordId};

/// Recorded sex of an animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Female,
    Male,
    Unknown,
}

impl FromStr for Sex {
    type Err = GeneticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "f" | "female" => Ok(Sex::Female),
            "m" | "male" => Ok(Sex::Male),
            "" | "unknown" => Ok(Sex::Unknown),
            other => Err(GeneticsError::Parse(format!("Unknown sex: '{}'", other))),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sex::Female => "female",
            Sex::Male => "male",
            Sex::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// An animal snapshot loaded from the record-management collaborator.
///
/// The engine treats animals as read-only input; identity, naming, and
/// species membership are owned elsewhere.
#[derive(Debug, Clone)]
pub struct Animal {
    pub id: AnimalId,
    pub name: String,
    pub sex: Sex,
    pub species_id: SpeciesId,
}

/// Which side of the pedigree a lineage edge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineageSide {
    Maternal,
    Paternal,
}

impl FromStr for LineageSide {
    type Err = GeneticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "maternal" | "dam" => Ok(LineageSide::Maternal),
            "p" | "paternal" | "sire" => Ok(LineageSide::Paternal),
            other => Err(GeneticsError::Parse(format!(
                "Unknown lineage side: '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for LineageSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineageSide::Maternal => f.write_str("Maternal"),
            LineageSide::Paternal => f.write_str("Paternal"),
        }
    }
}

/// A recorded ancestor relationship: directed edge animal -> ancestor.
///
/// Edges are stored flat per animal, one per recorded generation/side path,
/// rather than derived from parent links. `sequence` disambiguates multiple
/// ancestors at the same generation and side.
#[derive(Debug, Clone)]
pub struct LineageEdge {
    pub animal_id: AnimalId,
    pub ancestor_id: AnimalId,
    /// Generation distance along this edge. Always >= 1.
    pub generation: u32,
    pub sequence: u32,
    pub side: LineageSide,
}

/// An observed trait recorded against an animal (e.g. coat colour "agouti").
#[derive(Debug, Clone)]
pub struct TraitRecord {
    pub id: TraitRecordId,
    pub animal_id: AnimalId,
    /// Trait-type name used for grouping, e.g. "Coat".
    pub trait_type: String,
    /// Display name of the trait value.
    pub name: String,
}

/// A recorded breeding attempt between a dam and a sire.
#[derive(Debug, Clone)]
pub struct Pairing {
    pub id: PairingId,
    pub dam_id: AnimalId,
    pub sire_id: AnimalId,
    pub project_id: ProjectId,
}
