use serde::{Deserialize, Serialize};
use std::io;

use crate::result::{Allocation, Outcome};
use crate::solver::SolveStatus;

/// Flat, serializable summary of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub status: SolveStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allocations: Vec<Allocation>,
}

impl From<&Outcome> for Report {
    fn from(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Optimal(plan) => Report {
                status: SolveStatus::Optimal,
                objective: Some(plan.objective),
                message: None,
                allocations: plan.allocations.clone(),
            },
            Outcome::Failed(failure) => Report {
                status: failure.status,
                objective: None,
                message: Some(failure.message.clone()),
                allocations: Vec::new(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Hospital ID")]
    hospital: &'a str,
    #[serde(rename = "Current Doctors")]
    current_doctors: u32,
    #[serde(rename = "Optimal Doctors")]
    optimal_doctors: u64,
    #[serde(rename = "Current Beds")]
    current_beds: u32,
    #[serde(rename = "Optimal Beds")]
    optimal_beds: u64,
    #[serde(rename = "Doctor Change")]
    doctor_change: i64,
    #[serde(rename = "Bed Change")]
    bed_change: i64,
    #[serde(rename = "Districts Served")]
    districts_served: usize,
}

/// Write one CSV row per hospital allocation.
pub fn write_csv<W: io::Write>(writer: W, allocations: &[Allocation]) -> Result<(), csv::Error> {
    let mut csv = csv::Writer::from_writer(writer);
    for a in allocations {
        csv.serialize(CsvRow {
            hospital: &a.hospital,
            current_doctors: a.current_doctors,
            optimal_doctors: a.optimal_doctors,
            current_beds: a.current_beds,
            optimal_beds: a.optimal_beds,
            doctor_change: a.doctor_change,
            bed_change: a.bed_change,
            districts_served: a.districts_served,
        })?;
    }
    csv.flush()?;
    Ok(())
}
