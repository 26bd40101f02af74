use good_lp::solvers::coin_cbc::{CoinCbcProblem, coin_cbc};
use good_lp::{Expression, ProblemVariables, SolverModel, Variable, variable, variables};
use tracing::debug;

use crate::config::{Config, CoverageMode};
use crate::eligibility::{EligibilityIndex, Link};
use crate::requirements::DistrictRequirement;
use crate::types::Tables;

/// Decision variables of one hospital.
#[derive(Debug, Clone, Copy)]
pub struct AllocationVars {
    pub doctors: Variable,
    pub beds: Variable,
}

/// Everything the model builder reads for one run.
#[derive(Debug, Clone, Copy)]
pub struct ModelInput<'a> {
    pub tables: &'a Tables,
    pub index: &'a EligibilityIndex,
    pub demand: &'a [f64],
    pub requirements: &'a [DistrictRequirement],
    pub config: &'a Config,
}

/// Build the complete integer program for one run.
pub fn build(input: &ModelInput) -> (CoinCbcProblem, Vec<AllocationVars>) {
    let (variables, allocation) = init_variables(input.tables.hospitals.len());

    let objective = create_objective_function(&allocation, input.demand);
    let model = create_model(variables, objective);

    let model = constrain_conservation(model, input.tables, &allocation);
    let model = constrain_capacity(model, input.tables, &allocation, input.config);
    let model = constrain_district_coverage(model, input, &allocation);
    let model = constrain_equity_priority(model, input, &allocation);
    let model = constrain_ratio_band(model, &allocation, input.config.ratio_band);

    debug!(
        hospitals = allocation.len(),
        districts_covered = input.requirements.len(),
        vulnerable_districts = input
            .requirements
            .iter()
            .filter(|r| r.equity.is_some())
            .count(),
        "assembled allocation model"
    );

    (model, allocation)
}

fn init_variables(hospitals: usize) -> (ProblemVariables, Vec<AllocationVars>) {
    let mut problem_vars = variables!();
    let allocation = (0..hospitals)
        .map(|_| AllocationVars {
            doctors: problem_vars.add(variable().integer().min(0)),
            beds: problem_vars.add(variable().integer().min(0)),
        })
        .collect();
    (problem_vars, allocation)
}

/// Doctors and beds count as the same demand-satisfying unit, weighted by
/// the hospital's demand score.
fn create_objective_function(allocation: &[AllocationVars], demand: &[f64]) -> Expression {
    allocation
        .iter()
        .zip(demand)
        .fold(Expression::from(0.0), |sum, (vars, &score)| {
            sum + vars.doctors * score + vars.beds * score
        })
}

fn create_model(variables: ProblemVariables, objective: Expression) -> CoinCbcProblem {
    #[allow(unused_mut)]
    let mut model = variables.maximise(objective).using(coin_cbc);
    #[cfg(not(debug_assertions))]
    model.set_parameter("loglevel", "0");
    model
}

fn sum_of(vars: impl Iterator<Item = Variable>) -> Expression {
    vars.fold(Expression::from(0.0), |sum, v| sum + v)
}

/// Totals of each resource stay equal to the current system totals.
fn constrain_conservation<Model: SolverModel>(
    model: Model,
    tables: &Tables,
    allocation: &[AllocationVars],
) -> Model {
    let total_doctors: f64 = tables.hospitals.iter().map(|h| h.doctors as f64).sum();
    let total_beds: f64 = tables.hospitals.iter().map(|h| h.beds as f64).sum();

    let doctors = sum_of(allocation.iter().map(|a| a.doctors));
    let beds = sum_of(allocation.iter().map(|a| a.beds));

    model.with(doctors.eq(total_doctors)).with(beds.eq(total_beds))
}

/// Each allocation stays within `[0, capacity_ratio * current]`.
fn constrain_capacity<Model: SolverModel>(
    model: Model,
    tables: &Tables,
    allocation: &[AllocationVars],
    config: &Config,
) -> Model {
    tables
        .hospitals
        .iter()
        .zip(allocation)
        .fold(model, |m, (hospital, vars)| {
            let max_doctors = config.capacity_ratio * hospital.doctors as f64;
            let max_beds = config.capacity_ratio * hospital.beds as f64;
            m.with(Expression::from(vars.doctors).leq(max_doctors))
                .with(Expression::from(vars.beds).leq(max_beds))
                .with(Expression::from(vars.doctors).geq(0.0))
                .with(Expression::from(vars.beds).geq(0.0))
        })
}

/// Distance-decayed, ownership-weighted sum of one resource over the
/// hospitals in range of a district.
fn decayed_sum<'a>(
    links: impl Iterator<Item = &'a Link>,
    input: &ModelInput,
    pick: impl Fn(usize) -> Variable,
) -> Expression {
    links.fold(Expression::from(0.0), |sum, link| {
        let ownership = input.tables.hospitals[link.hospital].ownership;
        let weight = input.config.ownership_factor(ownership) / link.km.sqrt();
        sum + pick(link.hospital) * weight
    })
}

/// Every reachable district must see enough decayed capacity to cover
/// its doctor and bed need.
fn constrain_district_coverage<Model: SolverModel>(
    model: Model,
    input: &ModelInput,
    allocation: &[AllocationVars],
) -> Model {
    input.requirements.iter().fold(model, |m, req| {
        let links = || input.index.district_links(req.district);
        let doctors = decayed_sum(links(), input, |h| allocation[h].doctors);

        let beds = match input.config.coverage_mode {
            CoverageMode::DoctorWeighted => doctors.clone(),
            CoverageMode::PerResource => decayed_sum(links(), input, |h| allocation[h].beds),
        };

        m.with(doctors.geq(req.doctor_coverage))
            .with(beds.geq(req.bed_coverage))
    })
}

/// High-vulnerability districts get a multiple of their need from nearby
/// hospitals, with public hospitals carrying a share when any are in range.
fn constrain_equity_priority<Model: SolverModel>(
    model: Model,
    input: &ModelInput,
    allocation: &[AllocationVars],
) -> Model {
    input.requirements.iter().fold(model, |m, req| {
        let Some(equity) = req.equity else {
            return m;
        };

        let nearby = || input.index.district_links(req.district);
        let doctors = sum_of(nearby().map(|l| allocation[l.hospital].doctors));
        let beds = sum_of(nearby().map(|l| allocation[l.hospital].beds));
        let m = m
            .with(doctors.geq(equity.doctors))
            .with(beds.geq(equity.beds));

        match equity.public_share {
            Some(share) => {
                let public = || input.index.public_links(req.district);
                let doctors = sum_of(public().map(|l| allocation[l.hospital].doctors));
                let beds = sum_of(public().map(|l| allocation[l.hospital].beds));
                m.with(doctors.geq(share * equity.doctors))
                    .with(beds.geq(share * equity.beds))
            }
            None => m,
        }
    })
}

/// Keep doctors within `[beds / band, beds * band]` at every hospital.
fn constrain_ratio_band<Model: SolverModel>(
    model: Model,
    allocation: &[AllocationVars],
    band: f64,
) -> Model {
    allocation.iter().fold(model, |m, vars| {
        let doctors_capped = Expression::from(vars.doctors) - vars.beds * band;
        let beds_capped = Expression::from(vars.beds) - vars.doctors * band;
        m.with(doctors_capped.leq(0.0)).with(beds_capped.leq(0.0))
    })
}
