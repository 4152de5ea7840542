//! Reimbursement policy engine.
//!
//! A pure mapping from trip facts and an immutable [`PolicyConfig`] to a reimbursement
//! amount. The rule dispatcher in `rules` chooses one of five formula families; the
//! component modules supply per-diem, mileage, receipt and efficiency amounts.

mod config;
mod domain;
mod efficiency;
mod mileage;
mod per_diem;
mod receipts;
mod rounding;
mod rules;
mod tariff;

#[cfg(test)]
mod tests;

pub use config::{
    ParameterValue, PolicyConfig, PolicyLoadError, UnknownParameter, VACATION_PENALTY_ENABLED,
};
pub use domain::{CalculationPath, ComputationTrace, ReceiptPath, TripInput};
pub use rounding::{format_amount, round_legacy};

use tracing::debug;

/// Stateless evaluator that applies a policy snapshot to trips.
#[derive(Debug, Clone, Default)]
pub struct PolicyEngine {
    config: PolicyConfig,
}

impl PolicyEngine {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Final amount, rounded to cents with the legacy quirk applied.
    pub fn compute(&self, trip: &TripInput) -> f64 {
        self.assess(trip).grand_total
    }

    /// Full breakdown of the evaluation, for diagnostics.
    pub fn assess(&self, trip: &TripInput) -> ComputationTrace {
        let trace = rules::evaluate(trip, &self.config);
        debug!(
            duration_days = trip.duration_days(),
            miles_traveled = trip.miles_traveled(),
            total_receipts_amount = trip.total_receipts_amount(),
            path = trace.path.label(),
            grand_total = trace.grand_total,
            "reimbursement computed"
        );
        trace
    }

    pub fn path_for(&self, trip: &TripInput) -> CalculationPath {
        rules::select_path(trip, &self.config)
    }
}

/// Computes the reimbursement for one trip against `config`.
pub fn compute(
    duration_days: i64,
    miles_traveled: f64,
    total_receipts_amount: f64,
    config: &PolicyConfig,
) -> f64 {
    let trip = TripInput::new(duration_days, miles_traveled, total_receipts_amount);
    rules::evaluate(&trip, config).grand_total
}
