use crate::policy::TripInput;
use crate::sanitize::{sanitize_integer, sanitize_real, RawValue};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Labeled trip with the amount the legacy system produced for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceCase {
    pub input: TripInput,
    pub expected_output: f64,
}

impl ReferenceCase {
    pub fn new(input: TripInput, expected_output: f64) -> Self {
        Self {
            input,
            expected_output,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CaseLoadError {
    #[error("failed to read reference cases: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid reference case JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid reference case CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Supported reference case file layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseFormat {
    Json,
    Csv,
}

impl CaseFormat {
    /// `.csv` files are CSV; everything else is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => CaseFormat::Csv,
            _ => CaseFormat::Json,
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonCase {
    input: JsonCaseInput,
    expected_output: f64,
}

#[derive(Debug, Deserialize)]
struct JsonCaseInput {
    trip_duration_days: RawValue,
    miles_traveled: RawValue,
    total_receipts_amount: RawValue,
}

#[derive(Debug, Deserialize)]
struct CsvCaseRow {
    trip_duration_days: String,
    miles_traveled: String,
    total_receipts_amount: String,
    expected_output: f64,
}

pub fn load_cases<P: AsRef<Path>>(path: P) -> Result<Vec<ReferenceCase>, CaseLoadError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    match CaseFormat::from_path(path) {
        CaseFormat::Json => parse_json_cases(reader),
        CaseFormat::Csv => parse_csv_cases(reader),
    }
}

pub fn parse_json_cases<R: Read>(reader: R) -> Result<Vec<ReferenceCase>, CaseLoadError> {
    let records: Vec<JsonCase> = serde_json::from_reader(reader)?;
    Ok(records
        .into_iter()
        .map(|record| {
            let input = TripInput::from_raw(
                record.input.trip_duration_days,
                record.input.miles_traveled,
                record.input.total_receipts_amount,
            );
            ReferenceCase::new(input, record.expected_output)
        })
        .collect())
}

pub fn parse_csv_cases<R: Read>(reader: R) -> Result<Vec<ReferenceCase>, CaseLoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut cases = Vec::new();

    for record in csv_reader.deserialize::<CsvCaseRow>() {
        let row = record?;
        let input = TripInput::new(
            sanitize_integer(row.trip_duration_days),
            sanitize_real(row.miles_traveled),
            sanitize_real(row.total_receipts_amount),
        );
        cases.push(ReferenceCase::new(input, row.expected_output));
    }

    Ok(cases)
}
