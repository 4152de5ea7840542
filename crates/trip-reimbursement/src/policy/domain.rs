use crate::sanitize::{sanitize_integer, sanitize_real, RawValue};
use serde::{Deserialize, Serialize};

/// Sanitized trip facts submitted for reimbursement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TripInput {
    duration_days: u32,
    miles_traveled: f64,
    total_receipts_amount: f64,
}

impl TripInput {
    /// Negative and non-finite values are clamped to zero.
    pub fn new(duration_days: i64, miles_traveled: f64, total_receipts_amount: f64) -> Self {
        let duration_days = u32::try_from(duration_days.max(0)).unwrap_or(u32::MAX);
        Self {
            duration_days,
            miles_traveled: non_negative(miles_traveled),
            total_receipts_amount: non_negative(total_receipts_amount),
        }
    }

    /// Sanitizes loosely formatted values (e.g. `"$1,200.50"`) before constructing the input.
    pub fn from_raw(
        duration_days: impl Into<RawValue>,
        miles_traveled: impl Into<RawValue>,
        total_receipts_amount: impl Into<RawValue>,
    ) -> Self {
        Self::new(
            sanitize_integer(duration_days),
            sanitize_real(miles_traveled),
            sanitize_real(total_receipts_amount),
        )
    }

    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    pub fn miles_traveled(&self) -> f64 {
        self.miles_traveled
    }

    pub fn total_receipts_amount(&self) -> f64 {
        self.total_receipts_amount
    }

    pub(crate) fn days(&self) -> f64 {
        f64::from(self.duration_days)
    }

    /// Average receipts per day, zero for a zero-day trip.
    pub fn daily_spend(&self) -> f64 {
        per_day(self.total_receipts_amount, self.duration_days)
    }

    /// Average miles per day, zero for a zero-day trip.
    pub fn miles_per_day(&self) -> f64 {
        per_day(self.miles_traveled, self.duration_days)
    }
}

fn per_day(amount: f64, duration_days: u32) -> f64 {
    if duration_days == 0 {
        0.0
    } else {
        amount / f64::from(duration_days)
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Top-level formula family selected by the rule dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationPath {
    ExtremeOneDayHighReceipt,
    ExtremeOneDayLowReceipt,
    VacationPenalty,
    LongTrip,
    Standard,
}

impl CalculationPath {
    pub fn label(&self) -> &'static str {
        match self {
            CalculationPath::ExtremeOneDayHighReceipt => "extreme one-day trip, high receipts",
            CalculationPath::ExtremeOneDayLowReceipt => "extreme one-day trip, low receipts",
            CalculationPath::VacationPenalty => "vacation penalty",
            CalculationPath::LongTrip => "long trip",
            CalculationPath::Standard => "standard",
        }
    }
}

/// Receipt treatment applied within the selected path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptPath {
    ShortTripHighReceipt,
    OneDayHighReceipt,
    OneDayUpperTier,
    TwoDayHighReceipt,
    TwoDayUpperTier,
    DailyCapApplied,
    Tiered,
    VacationFlat,
    LongTripCapApplied,
    LongTripTiered,
}

/// Diagnostic breakdown of one evaluation. Never consulted for control flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationTrace {
    pub path: CalculationPath,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_path: Option<ReceiptPath>,
    pub per_diem: f64,
    pub mileage: f64,
    pub receipts: f64,
    pub penalty: f64,
    pub efficiency_bonus: f64,
    pub unrounded_total: f64,
    pub grand_total: f64,
}
