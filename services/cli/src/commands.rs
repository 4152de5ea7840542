use clap::Args;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;
use trip_reimbursement::calibration::{
    CalibrationPlan, CalibrationReport, Calibrator, DescentStep, GridAxis,
};
use trip_reimbursement::error::AppError;
use trip_reimbursement::harness::{evaluate_cases, load_cases, write_results_csv, BatchReport};
use trip_reimbursement::policy::{format_amount, PolicyConfig, PolicyEngine, TripInput};

#[derive(Args, Debug)]
pub(crate) struct TripArgs {
    /// Trip duration in days
    #[arg(required = true, allow_negative_numbers = true, allow_hyphen_values = true)]
    trip_duration_days: Option<String>,
    /// Miles traveled
    #[arg(required = true, allow_negative_numbers = true, allow_hyphen_values = true)]
    miles_traveled: Option<String>,
    /// Total receipts amount
    #[arg(required = true, allow_negative_numbers = true, allow_hyphen_values = true)]
    total_receipts_amount: Option<String>,
    /// Write the computation trace as JSON to stderr
    #[arg(long)]
    explain: bool,
}

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Reference cases (JSON array, or CSV when the extension is .csv)
    #[arg(long)]
    cases: PathBuf,
    /// Write per-case results to this CSV file
    #[arg(long)]
    results: Option<PathBuf>,
    /// Number of highest-error cases to list
    #[arg(long, default_value_t = 5)]
    worst: usize,
}

#[derive(Args, Debug)]
pub(crate) struct CalibrateArgs {
    /// Reference cases (JSON array, or CSV when the extension is .csv)
    #[arg(long)]
    cases: PathBuf,
    /// Grid axis as NAME=V1,V2,... (repeatable)
    #[arg(long = "grid")]
    grid: Vec<GridAxis>,
    /// Coordinate descent step as NAME=STEP (repeatable)
    #[arg(long = "descend")]
    descend: Vec<DescentStep>,
    /// Coordinate descent rounds
    #[arg(long, default_value_t = 10)]
    rounds: usize,
    /// Write the best policy to this JSON file
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run_compute(policy: PolicyConfig, args: TripArgs) -> Result<(), AppError> {
    let TripArgs {
        trip_duration_days,
        miles_traveled,
        total_receipts_amount,
        explain,
    } = args;

    let trip = TripInput::from_raw(
        trip_duration_days.unwrap_or_default(),
        miles_traveled.unwrap_or_default(),
        total_receipts_amount.unwrap_or_default(),
    );
    let engine = PolicyEngine::new(policy);
    let trace = engine.assess(&trip);

    if explain {
        eprintln!("{}", serde_json::to_string_pretty(&trace)?);
    }
    println!("{}", format_amount(trace.grand_total));
    Ok(())
}

pub(crate) fn run_evaluate(policy: PolicyConfig, args: EvaluateArgs) -> Result<(), AppError> {
    let cases = load_cases(&args.cases)?;
    info!(cases = cases.len(), path = %args.cases.display(), "loaded reference cases");

    let engine = PolicyEngine::new(policy);
    let report = evaluate_cases(&engine, &cases);

    if let Some(path) = &args.results {
        let file = File::create(path)?;
        write_results_csv(&report, BufWriter::new(file))?;
    }

    render_batch_report(&report, args.worst);
    Ok(())
}

fn render_batch_report(report: &BatchReport, worst: usize) {
    println!("Reimbursement evaluation");
    println!("  Total cases:            {}", report.total_cases);
    println!(
        "  Exact matches (±$0.01): {} ({:.1}%)",
        report.exact_matches,
        report.exact_match_pct()
    );
    println!(
        "  Close matches (±$1.00): {} ({:.1}%)",
        report.close_matches,
        report.close_match_pct()
    );
    println!("  Average error:          ${:.2}", report.average_error);
    println!("  Maximum error:          ${:.2}", report.max_error);
    println!("  Score:                  {:.2} (lower is better)", report.score);

    if report.total_cases == 0 {
        return;
    }

    println!("\nPaths taken");
    for (path, count) in report.path_counts() {
        println!("  {path}: {count}");
    }

    let worst_cases = report.worst(worst);
    if worst_cases.iter().any(|result| !result.is_exact()) {
        println!("\nHighest-error cases");
        for result in worst_cases.into_iter().filter(|result| !result.is_exact()) {
            println!(
                "  Case {}: {} days, {} miles, ${} receipts [{}]",
                result.case_number,
                result.input.duration_days(),
                result.input.miles_traveled(),
                result.input.total_receipts_amount(),
                result.path.label()
            );
            println!(
                "    Expected: ${}, Got: ${}, Error: ${}",
                format_amount(result.expected),
                format_amount(result.actual),
                format_amount(result.error)
            );
        }
    }
}

#[derive(Debug, Serialize)]
struct CalibrationSummary<'a> {
    generated_at: String,
    cases: usize,
    evaluations: usize,
    initial_error: f64,
    best_error: f64,
    changed: BTreeMap<&'static str, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<&'a PathBuf>,
}

pub(crate) fn run_calibrate(policy: PolicyConfig, args: CalibrateArgs) -> Result<(), AppError> {
    let cases = load_cases(&args.cases)?;
    let plan = CalibrationPlan {
        grid: args.grid,
        descent: args.descend,
        max_rounds: args.rounds,
    };

    let mut calibrator = Calibrator::new(&cases)?;
    let report = calibrator.run(&policy, &plan)?;

    if let Some(path) = &args.output {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &report.config)?;
        writer.flush()?;
    }

    let summary = summarize(&policy, &report, args.output.as_ref());
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn summarize<'a>(
    start: &PolicyConfig,
    report: &CalibrationReport,
    output: Option<&'a PathBuf>,
) -> CalibrationSummary<'a> {
    let before = start.to_map();
    let changed = report
        .config
        .to_map()
        .into_iter()
        .filter(|(name, value)| before.get(name) != Some(value))
        .collect();

    CalibrationSummary {
        generated_at: report.generated_at.to_rfc3339(),
        cases: report.cases,
        evaluations: report.evaluations,
        initial_error: report.initial_error,
        best_error: report.best_error,
        changed,
        output,
    }
}
