use crate::policy::{format_amount, CalculationPath, TripInput};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// Outcome of evaluating one reference case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseResult {
    pub case_number: usize,
    pub input: TripInput,
    pub path: CalculationPath,
    pub expected: f64,
    pub actual: f64,
    pub error: f64,
}

impl CaseResult {
    pub(crate) fn new(
        case_number: usize,
        input: TripInput,
        path: CalculationPath,
        expected: f64,
        actual: f64,
    ) -> Self {
        Self {
            case_number,
            input,
            path,
            expected,
            actual,
            error: cents_error(expected, actual),
        }
    }

    pub fn is_exact(&self) -> bool {
        self.error < 0.01
    }

    pub fn is_close(&self) -> bool {
        self.error < 1.0
    }
}

/// Absolute difference in whole cents, so a 0.01 gap never counts as exact and float noise
/// never leaks into averages.
pub(crate) fn cents_error(expected: f64, actual: f64) -> f64 {
    ((actual * 100.0).round() - (expected * 100.0).round()).abs() / 100.0
}

/// Aggregate accuracy of a policy snapshot over a reference case set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub total_cases: usize,
    pub exact_matches: usize,
    pub close_matches: usize,
    pub average_error: f64,
    pub max_error: f64,
    pub score: f64,
    pub results: Vec<CaseResult>,
}

impl BatchReport {
    pub fn from_results(results: Vec<CaseResult>) -> Self {
        let total_cases = results.len();
        let exact_matches = results.iter().filter(|result| result.is_exact()).count();
        let close_matches = results.iter().filter(|result| result.is_close()).count();
        let total_error: f64 = results.iter().map(|result| result.error).sum();
        let max_error = results
            .iter()
            .map(|result| result.error)
            .fold(0.0_f64, f64::max);
        let average_error = if total_cases == 0 {
            0.0
        } else {
            total_error / total_cases as f64
        };
        let score = average_error * 100.0 + (total_cases - exact_matches) as f64 * 0.1;

        Self {
            total_cases,
            exact_matches,
            close_matches,
            average_error,
            max_error,
            score,
            results,
        }
    }

    pub fn exact_match_pct(&self) -> f64 {
        percentage(self.exact_matches, self.total_cases)
    }

    pub fn close_match_pct(&self) -> f64 {
        percentage(self.close_matches, self.total_cases)
    }

    /// Highest-error cases first; ties keep case order.
    pub fn worst(&self, limit: usize) -> Vec<&CaseResult> {
        let mut ranked: Vec<&CaseResult> = self.results.iter().collect();
        ranked.sort_by(|a, b| b.error.total_cmp(&a.error));
        ranked.truncate(limit);
        ranked
    }

    pub fn path_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for result in &self.results {
            *counts.entry(result.path.label()).or_insert(0) += 1;
        }
        counts
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    case: usize,
    trip_duration_days: u32,
    miles_traveled: f64,
    total_receipts_amount: f64,
    path: &'a str,
    expected: String,
    actual: String,
    error: String,
}

/// Writes one CSV row per case, in case order.
pub fn write_results_csv<W: Write>(report: &BatchReport, writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for result in &report.results {
        csv_writer.serialize(ResultRow {
            case: result.case_number,
            trip_duration_days: result.input.duration_days(),
            miles_traveled: result.input.miles_traveled(),
            total_receipts_amount: result.input.total_receipts_amount(),
            path: result.path.label(),
            expected: format_amount(result.expected),
            actual: format_amount(result.actual),
            error: format_amount(result.error),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}
