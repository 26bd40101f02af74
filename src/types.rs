use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Who operates a hospital. Public hospitals carry a heavier weight in both
/// the demand score and the coverage sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ownership {
    Public,
    Private,
}

impl Ownership {
    /// Resolve a raw ownership label. Matching ignores case and surrounding
    /// whitespace; anything other than public/private is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "public" => Some(Self::Public),
            "private" => Some(Self::Private),
            _ => None,
        }
    }

    pub fn is_public(self) -> bool {
        self == Self::Public
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: String,
    pub ownership: Ownership,
    pub doctors: u32,
    pub beds: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
    pub id: String,
    pub population: u64,
    /// Composite vulnerability index, unitless and non-negative.
    pub vulnerability: f64,
}

/// One entry of the sparse hospital/district distance table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    pub hospital: String,
    pub district: String,
    pub km: f64,
}

/// The three read-only input tables of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tables {
    pub hospitals: Vec<Hospital>,
    pub districts: Vec<District>,
    pub distances: Vec<Distance>,
}

// Raw rows as they arrive from a problem file. Ownership stays a string and
// counts stay signed so the validation layer can report bad values instead
// of the deserializer rejecting them with a generic message.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HospitalRow {
    pub id: String,
    pub ownership: String,
    pub doctors: i64,
    pub beds: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistrictRow {
    pub id: String,
    pub population: i64,
    pub vulnerability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceRow {
    pub hospital: String,
    pub district: String,
    pub km: f64,
}

/// A complete problem file: the three tables plus optional tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub hospitals: Vec<HospitalRow>,
    pub districts: Vec<DistrictRow>,
    #[serde(default)]
    pub distances: Vec<DistanceRow>,
    #[serde(default)]
    pub config: Config,
}
