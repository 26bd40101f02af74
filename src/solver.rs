use good_lp::{
    ResolutionError, Solution as LpSolution, SolutionStatus, SolverModel, WithTimeLimit,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::model::{self, ModelInput};

/// Terminal status of one solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    NotSolved,
    SolverError,
    SolverTimeout,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolveStatus::Optimal => "Optimal",
            SolveStatus::Infeasible => "Infeasible",
            SolveStatus::Unbounded => "Unbounded",
            SolveStatus::NotSolved => "NotSolved",
            SolveStatus::SolverError => "SolverError",
            SolveStatus::SolverTimeout => "SolverTimeout",
        };
        f.write_str(name)
    }
}

/// Raw integer values read back from an optimal solve, one pair per
/// hospital in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedValues {
    pub doctors: Vec<f64>,
    pub beds: Vec<f64>,
}

/// Either the solved values or the reason there are none.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutput {
    Solved(SolvedValues),
    Failed { status: SolveStatus, message: String },
}

impl SolveOutput {
    fn failed(status: SolveStatus, message: impl Into<String>) -> Self {
        SolveOutput::Failed {
            status,
            message: message.into(),
        }
    }
}

/// Map a good_lp resolution failure onto a run status.
pub fn status_of(err: &ResolutionError) -> SolveStatus {
    match err {
        ResolutionError::Infeasible => SolveStatus::Infeasible,
        ResolutionError::Unbounded => SolveStatus::Unbounded,
        // CBC halted before finishing for a reason other than its time limit.
        ResolutionError::Other("Stopped") | ResolutionError::Other("UserEvent") => {
            SolveStatus::NotSolved
        }
        _ => SolveStatus::SolverError,
    }
}

/// Map the status of a returned solution. Only a proven optimum is usable.
pub fn status_of_solution(status: SolutionStatus) -> SolveStatus {
    match status {
        SolutionStatus::Optimal => SolveStatus::Optimal,
        SolutionStatus::TimeLimit => SolveStatus::SolverTimeout,
        SolutionStatus::GapLimit => SolveStatus::NotSolved,
    }
}

/// Build and solve the model in one blocking call.
///
/// With `time_limit_secs` set, CBC itself stops the search once the limit
/// is reached (rounded up to whole seconds); the incumbent it holds at that
/// point is discarded. An empty hospital table is trivially optimal and
/// never reaches the solver.
pub fn run(input: &ModelInput) -> SolveOutput {
    if input.tables.hospitals.is_empty() {
        return SolveOutput::Solved(SolvedValues {
            doctors: Vec::new(),
            beds: Vec::new(),
        });
    }

    let (problem, allocation) = model::build(input);
    let problem = match input.config.time_limit_secs {
        Some(secs) => problem.with_time_limit(secs),
        None => problem,
    };

    let solution = match problem.solve() {
        Ok(solution) => solution,
        Err(err) => {
            let status = status_of(&err);
            warn!(%status, error = %err, "solver found no optimal solution");
            return SolveOutput::failed(status, err.to_string());
        }
    };

    match status_of_solution(solution.status()) {
        SolveStatus::Optimal => {
            debug!("solver reported an optimal solution");
            SolveOutput::Solved(SolvedValues {
                doctors: allocation.iter().map(|a| solution.value(a.doctors)).collect(),
                beds: allocation.iter().map(|a| solution.value(a.beds)).collect(),
            })
        }
        status => {
            warn!(%status, "solver stopped before proving optimality");
            SolveOutput::failed(
                status,
                format!("solver stopped with {:?} before proving optimality", solution.status()),
            )
        }
    }
}
