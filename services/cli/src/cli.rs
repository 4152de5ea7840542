use crate::commands::{
    run_calibrate, run_compute, run_evaluate, CalibrateArgs, EvaluateArgs, TripArgs,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trip_reimbursement::config::{AppConfig, PolicySource};
use trip_reimbursement::error::AppError;
use trip_reimbursement::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "reimburse",
    about = "Compute legacy-compatible travel reimbursements",
    version,
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
struct Cli {
    /// Policy override file (flat JSON of parameter name to value)
    #[arg(long, global = true)]
    policy: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
    #[command(flatten)]
    trip: TripArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score the policy against a labeled reference case file
    Evaluate(EvaluateArgs),
    /// Search for policy values that minimize error against reference cases
    Calibrate(CalibrateArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    if let Some(path) = cli.policy {
        config.policy = PolicySource::File(path);
    }

    telemetry::init(&config.telemetry)?;
    let policy = config.policy.load()?;

    match cli.command {
        Some(Command::Evaluate(args)) => run_evaluate(policy, args),
        Some(Command::Calibrate(args)) => run_calibrate(policy, args),
        None => run_compute(policy, cli.trip),
    }
}
