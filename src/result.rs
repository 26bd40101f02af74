use serde::{Deserialize, Serialize};

use crate::eligibility::EligibilityIndex;
use crate::solver::{SolveOutput, SolveStatus};
use crate::types::Tables;

/// Current versus optimal staffing of one hospital.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub hospital: String,
    pub current_doctors: u32,
    pub optimal_doctors: u64,
    pub current_beds: u32,
    pub optimal_beds: u64,
    pub doctor_change: i64,
    pub bed_change: i64,
    pub districts_served: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub objective: f64,
    pub allocations: Vec<Allocation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub status: SolveStatus,
    pub message: String,
}

/// Result of one run. A failure never carries allocation data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Optimal(Plan),
    Failed(Failure),
}

impl Outcome {
    pub fn status(&self) -> SolveStatus {
        match self {
            Outcome::Optimal(_) => SolveStatus::Optimal,
            Outcome::Failed(failure) => failure.status,
        }
    }

    pub fn plan(&self) -> Option<&Plan> {
        match self {
            Outcome::Optimal(plan) => Some(plan),
            Outcome::Failed(_) => None,
        }
    }
}

/// Largest count an `f64` holds exactly.
const MAX_EXACT_COUNT: f64 = 9_007_199_254_740_992.0;

/// Round a solver value to a head count. CBC reports integers as floats
/// with tolerance noise, so only values that round into range are accepted.
fn count(value: f64) -> Option<u64> {
    let rounded = value.round();
    (rounded.is_finite() && (0.0..=MAX_EXACT_COUNT).contains(&rounded)).then(|| rounded as u64)
}

fn change(optimal: u64, current: u32) -> i64 {
    // `optimal` is bounded by `count`, so it fits an i64.
    optimal as i64 - i64::from(current)
}

/// Turn solver output into per-hospital allocation records.
pub fn extract(
    output: SolveOutput,
    tables: &Tables,
    index: &EligibilityIndex,
    demand: &[f64],
) -> Outcome {
    let values = match output {
        SolveOutput::Solved(values) => values,
        SolveOutput::Failed { status, message } => {
            return Outcome::Failed(Failure { status, message });
        }
    };

    let mut allocations = Vec::with_capacity(tables.hospitals.len());
    for (h, hospital) in tables.hospitals.iter().enumerate() {
        let (Some(optimal_doctors), Some(optimal_beds)) = (
            values.doctors.get(h).copied().and_then(count),
            values.beds.get(h).copied().and_then(count),
        ) else {
            return Outcome::Failed(Failure {
                status: SolveStatus::SolverError,
                message: format!("solver returned no usable allocation for {}", hospital.id),
            });
        };
        allocations.push(Allocation {
            hospital: hospital.id.clone(),
            current_doctors: hospital.doctors,
            optimal_doctors,
            current_beds: hospital.beds,
            optimal_beds,
            doctor_change: change(optimal_doctors, hospital.doctors),
            bed_change: change(optimal_beds, hospital.beds),
            districts_served: index.districts_served(h),
        });
    }

    let objective: f64 = allocations
        .iter()
        .zip(demand)
        .map(|(a, score)| score * (a.optimal_doctors as f64 + a.optimal_beds as f64))
        .sum();

    Outcome::Optimal(Plan {
        objective,
        allocations,
    })
}
