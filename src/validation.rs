//! Input checks run before any model is built.
//!
//! Validation is fail-fast: the first bad record aborts the run and no
//! variables or constraints are created.

use std::collections::BTreeSet;
use thiserror::Error;

use crate::types::{
    Distance, DistanceRow, District, DistrictRow, Hospital, HospitalRow, Ownership, Problem,
    Tables,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("hospital '{hospital}' has unrecognized ownership '{value}' (expected Public or Private)")]
    UnknownOwnership { hospital: String, value: String },
    #[error("hospital '{hospital}' has a negative {field} count ({value})")]
    NegativeCount {
        hospital: String,
        field: &'static str,
        value: i64,
    },
    #[error("hospital '{hospital}' has a {field} count too large to allocate ({value})")]
    CountOutOfRange {
        hospital: String,
        field: &'static str,
        value: i64,
    },
    #[error("district '{district}' has a negative population ({value})")]
    NegativePopulation { district: String, value: i64 },
    #[error("district '{district}' has an invalid vulnerability index ({value})")]
    InvalidVulnerability { district: String, value: f64 },
    #[error("distance from '{hospital}' to '{district}' must be a positive number of km ({value})")]
    NonPositiveDistance {
        hospital: String,
        district: String,
        value: f64,
    },
    #[error("duplicate {table} id '{id}'")]
    DuplicateId { table: &'static str, id: String },
    #[error("duplicate distance entry for '{hospital}' -> '{district}'")]
    DuplicateDistance { hospital: String, district: String },
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

impl Problem {
    /// Convert the raw rows of a problem file into validated tables.
    pub fn tables(&self) -> Result<Tables, ValidationError> {
        let hospitals = self
            .hospitals
            .iter()
            .map(hospital_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        let districts = self
            .districts
            .iter()
            .map(district_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        let distances = self.distances.iter().map(distance_from_row).collect();

        let tables = Tables {
            hospitals,
            districts,
            distances,
        };
        validate_tables(&tables)?;
        Ok(tables)
    }
}

fn hospital_from_row(row: &HospitalRow) -> Result<Hospital, ValidationError> {
    let ownership =
        Ownership::parse(&row.ownership).ok_or_else(|| ValidationError::UnknownOwnership {
            hospital: row.id.clone(),
            value: row.ownership.clone(),
        })?;

    Ok(Hospital {
        id: row.id.clone(),
        ownership,
        doctors: count(&row.id, "doctor", row.doctors)?,
        beds: count(&row.id, "bed", row.beds)?,
    })
}

fn count(hospital: &str, field: &'static str, value: i64) -> Result<u32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::NegativeCount {
            hospital: hospital.to_owned(),
            field,
            value,
        });
    }
    u32::try_from(value).map_err(|_| ValidationError::CountOutOfRange {
        hospital: hospital.to_owned(),
        field,
        value,
    })
}

fn district_from_row(row: &DistrictRow) -> Result<District, ValidationError> {
    let population = u64::try_from(row.population).map_err(|_| {
        ValidationError::NegativePopulation {
            district: row.id.clone(),
            value: row.population,
        }
    })?;

    Ok(District {
        id: row.id.clone(),
        population,
        vulnerability: row.vulnerability,
    })
}

fn distance_from_row(row: &DistanceRow) -> Distance {
    Distance {
        hospital: row.hospital.clone(),
        district: row.district.clone(),
        km: row.km,
    }
}

/// Check the typed tables for values their types cannot rule out.
///
/// Distance entries naming unknown hospitals or districts are not errors;
/// the eligibility index skips them.
pub fn validate_tables(tables: &Tables) -> Result<(), ValidationError> {
    let mut hospital_ids = BTreeSet::new();
    for hospital in &tables.hospitals {
        if !hospital_ids.insert(hospital.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                table: "hospital",
                id: hospital.id.clone(),
            });
        }
    }

    let mut district_ids = BTreeSet::new();
    for district in &tables.districts {
        if !district_ids.insert(district.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                table: "district",
                id: district.id.clone(),
            });
        }
        if !district.vulnerability.is_finite() || district.vulnerability < 0.0 {
            return Err(ValidationError::InvalidVulnerability {
                district: district.id.clone(),
                value: district.vulnerability,
            });
        }
    }

    let mut pairs = BTreeSet::new();
    for distance in &tables.distances {
        if !distance.km.is_finite() || distance.km <= 0.0 {
            return Err(ValidationError::NonPositiveDistance {
                hospital: distance.hospital.clone(),
                district: distance.district.clone(),
                value: distance.km,
            });
        }
        if !pairs.insert((distance.hospital.as_str(), distance.district.as_str())) {
            return Err(ValidationError::DuplicateDistance {
                hospital: distance.hospital.clone(),
                district: distance.district.clone(),
            });
        }
    }

    Ok(())
}
