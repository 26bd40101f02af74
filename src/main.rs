use clap::{Parser, ValueEnum};
use std::fs::{File, read_to_string};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::info;

use hospital_realloc::report::{Report, write_csv};
use hospital_realloc::telemetry::{self, TelemetryError};
use hospital_realloc::{CoverageMode, Outcome, Problem, ValidationError};

#[derive(Parser, Debug)]
#[command(
    name = "hospital-realloc",
    about = "Reallocate doctors and inpatient beds across hospitals to match district need",
    version
)]
struct Cli {
    /// Problem file with hospitals, districts, distances and optional config
    problem: PathBuf,
    /// Write the allocation table as CSV to this path instead of YAML to stdout
    #[arg(long)]
    output: Option<PathBuf>,
    /// Override the eligibility distance threshold (km)
    #[arg(long)]
    threshold_km: Option<f64>,
    /// Give up on the solver after this many seconds
    #[arg(long)]
    time_limit_secs: Option<f64>,
    /// Which allocation the bed-need coverage threshold is checked against
    #[arg(long, value_enum)]
    coverage_mode: Option<CoverageArg>,
    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CoverageArg {
    DoctorWeighted,
    PerResource,
}

impl From<CoverageArg> for CoverageMode {
    fn from(value: CoverageArg) -> Self {
        match value {
            CoverageArg::DoctorWeighted => CoverageMode::DoctorWeighted,
            CoverageArg::PerResource => CoverageMode::PerResource,
        }
    }
}

#[derive(Debug, Error)]
enum AppError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid problem file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("data validation error: {0}")]
    Validation(#[from] ValidationError),
}

fn run(cli: Cli) -> Result<Outcome, AppError> {
    telemetry::init(&cli.log_level)?;

    let buf = read_to_string(&cli.problem)?;
    let mut problem: Problem = serde_yaml::from_str(&buf)?;
    if let Some(km) = cli.threshold_km {
        problem.config.distance_threshold_km = km;
    }
    if let Some(secs) = cli.time_limit_secs {
        problem.config.time_limit_secs = Some(secs);
    }
    if let Some(mode) = cli.coverage_mode {
        problem.config.coverage_mode = mode.into();
    }

    let outcome = problem.solve()?;

    match (&cli.output, outcome.plan()) {
        (Some(path), Some(plan)) => {
            write_csv(File::create(path)?, &plan.allocations)?;
            info!(path = %path.display(), "wrote allocation results");
        }
        _ => println!("{}", serde_yaml::to_string(&Report::from(&outcome))?),
    }
    Ok(outcome)
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(Outcome::Optimal(_)) => ExitCode::SUCCESS,
        Ok(Outcome::Failed(failure)) => {
            eprintln!("no optimal allocation: {} ({})", failure.status, failure.message);
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("application error: {err}");
            ExitCode::FAILURE
        }
    }
}
