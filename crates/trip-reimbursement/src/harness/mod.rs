//! Batch evaluation of a policy snapshot against labeled reference cases.

mod cases;
mod report;

pub use cases::{
    load_cases, parse_csv_cases, parse_json_cases, CaseFormat, CaseLoadError, ReferenceCase,
};
pub use report::{write_results_csv, BatchReport, CaseResult};

use crate::policy::{PolicyConfig, PolicyEngine};
use report::cents_error;
use tracing::{debug, info};

const PROGRESS_INTERVAL: usize = 100;

/// Runs every case through `engine` and aggregates the error statistics.
pub fn evaluate_cases(engine: &PolicyEngine, cases: &[ReferenceCase]) -> BatchReport {
    let mut results = Vec::with_capacity(cases.len());

    for (index, case) in cases.iter().enumerate() {
        if index > 0 && index % PROGRESS_INTERVAL == 0 {
            info!(processed = index, total = cases.len(), "evaluating reference cases");
        }

        let trace = engine.assess(&case.input);
        let result = CaseResult::new(
            index + 1,
            case.input,
            trace.path,
            case.expected_output,
            trace.grand_total,
        );
        if !result.is_exact() {
            debug!(case = result.case_number, error = result.error, "reference mismatch");
        }
        results.push(result);
    }

    let report = BatchReport::from_results(results);
    info!(
        total = report.total_cases,
        exact = report.exact_matches,
        average_error = report.average_error,
        "evaluation complete"
    );
    report
}

/// Mean absolute error of `config` over `cases`; the calibration objective.
pub fn mean_absolute_error(config: &PolicyConfig, cases: &[ReferenceCase]) -> f64 {
    if cases.is_empty() {
        return 0.0;
    }
    let total: f64 = cases
        .iter()
        .map(|case| {
            let input = &case.input;
            let actual = crate::policy::compute(
                i64::from(input.duration_days()),
                input.miles_traveled(),
                input.total_receipts_amount(),
                config,
            );
            cents_error(case.expected_output, actual)
        })
        .sum();
    total / cases.len() as f64
}
