pub mod config;
pub mod eligibility;
pub mod model;
pub mod report;
pub mod requirements;
pub mod result;
pub mod solver;
pub mod telemetry;
pub mod types;
pub mod validation;

use tracing::info;

pub use config::{Config, CoverageMode};
pub use result::{Allocation, Failure, Outcome, Plan};
pub use solver::SolveStatus;
pub use types::{Distance, District, Hospital, Ownership, Problem, Tables};
pub use validation::ValidationError;

use eligibility::{EligibilityIndex, demand_scores};
use model::ModelInput;
use requirements::district_requirements;

/// Reallocate the current doctor and bed pool across `tables.hospitals`.
///
/// Invalid input is returned as an error before anything is built. Every
/// solver outcome, including infeasibility, comes back as an [`Outcome`].
pub fn solve(tables: &Tables, config: &Config) -> Result<Outcome, ValidationError> {
    config.validate()?;
    validation::validate_tables(tables)?;
    Ok(solve_validated(tables, config))
}

fn solve_validated(tables: &Tables, config: &Config) -> Outcome {
    info!(
        hospitals = tables.hospitals.len(),
        districts = tables.districts.len(),
        distances = tables.distances.len(),
        "validated input tables"
    );

    let index = EligibilityIndex::build(tables, config.distance_threshold_km);
    let demand = demand_scores(tables, &index, config);
    let requirements = district_requirements(tables, &index, config);
    info!(
        eligible_links = index.len(),
        covered_districts = requirements.len(),
        "derived eligibility and demand"
    );

    let output = solver::run(&ModelInput {
        tables,
        index: &index,
        demand: &demand,
        requirements: &requirements,
        config,
    });
    let outcome = result::extract(output, tables, &index, &demand);

    match &outcome {
        Outcome::Optimal(plan) => info!(objective = plan.objective, "optimal allocation found"),
        Outcome::Failed(failure) => {
            info!(status = %failure.status, message = %failure.message, "no optimal allocation")
        }
    }
    outcome
}

impl Problem {
    /// Solve a parsed problem file. The rows are validated once, while they
    /// are converted into tables.
    pub fn solve(&self) -> Result<Outcome, ValidationError> {
        self.config.validate()?;
        let tables = self.tables()?;
        Ok(solve_validated(&tables, &self.config))
    }
}
