use super::config::PolicyConfig;
use super::domain::{CalculationPath, ComputationTrace, TripInput};
use super::efficiency::efficiency_bonus;
use super::mileage::mileage_total;
use super::per_diem::{long_trip_per_diem, per_diem_total};
use super::receipts::{long_trip_receipts, standard_receipts, vacation_receipts, ReceiptOutcome};
use super::rounding::round_legacy;

const EXTREME_DAY_MILES: f64 = 800.0;

/// Picks the single formula family that applies to `trip`. Rules are checked in priority
/// order and the first match wins.
pub(crate) fn select_path(trip: &TripInput, config: &PolicyConfig) -> CalculationPath {
    let days = trip.days();

    if trip.duration_days() == 1 && trip.miles_traveled() > EXTREME_DAY_MILES {
        return if trip.total_receipts_amount() > config.extreme_day_receipt_threshold {
            CalculationPath::ExtremeOneDayHighReceipt
        } else {
            CalculationPath::ExtremeOneDayLowReceipt
        };
    }

    if config.vacation_penalty_enabled
        && trip.duration_days() > 0
        && days >= config.vacation_penalty_duration_threshold
        && trip.daily_spend() > config.vacation_penalty_spend_threshold
    {
        return CalculationPath::VacationPenalty;
    }

    if trip.duration_days() > 0 && days >= config.long_trip_duration_threshold {
        return CalculationPath::LongTrip;
    }

    CalculationPath::Standard
}

/// Runs the selected path and rounds the grand total exactly once.
pub(crate) fn evaluate(trip: &TripInput, config: &PolicyConfig) -> ComputationTrace {
    let path = select_path(trip, config);

    let components = match path {
        CalculationPath::ExtremeOneDayHighReceipt => Components::flat(
            trip.total_receipts_amount() * config.extreme_day_high_receipt_pct,
        ),
        CalculationPath::ExtremeOneDayLowReceipt => Components::flat(
            (trip.miles_traveled() + trip.total_receipts_amount())
                * config.extreme_day_low_receipt_multiplier,
        ),
        CalculationPath::VacationPenalty => Components::additive(
            per_diem_total(trip, config) * config.vacation_penalty_per_diem_pct,
            trip,
            vacation_receipts(trip, config),
            config,
        ),
        CalculationPath::LongTrip => Components::additive(
            long_trip_per_diem(trip, config),
            trip,
            long_trip_receipts(trip, config),
            config,
        ),
        CalculationPath::Standard => Components::additive(
            per_diem_total(trip, config),
            trip,
            standard_receipts(trip, config),
            config,
        ),
    };

    let unrounded_total = components.sum();
    ComputationTrace {
        path,
        receipt_path: components.receipts.map(|outcome| outcome.path),
        per_diem: components.per_diem,
        mileage: components.mileage,
        receipts: components.receipt_amount(),
        penalty: components.penalty(),
        efficiency_bonus: components.efficiency_bonus,
        unrounded_total,
        grand_total: round_legacy(unrounded_total),
    }
}

struct Components {
    per_diem: f64,
    mileage: f64,
    receipts: Option<ReceiptOutcome>,
    efficiency_bonus: f64,
    flat: f64,
}

impl Components {
    /// Extreme-day paths replace every component with one amount.
    fn flat(amount: f64) -> Self {
        Self {
            per_diem: 0.0,
            mileage: 0.0,
            receipts: None,
            efficiency_bonus: 0.0,
            flat: amount,
        }
    }

    fn additive(
        per_diem: f64,
        trip: &TripInput,
        receipts: ReceiptOutcome,
        config: &PolicyConfig,
    ) -> Self {
        Self {
            per_diem,
            mileage: mileage_total(trip.miles_traveled(), config),
            receipts: Some(receipts),
            efficiency_bonus: efficiency_bonus(trip, config),
            flat: 0.0,
        }
    }

    fn receipt_amount(&self) -> f64 {
        self.receipts
            .map(|outcome| outcome.amount)
            .unwrap_or(self.flat)
    }

    fn penalty(&self) -> f64 {
        self.receipts.map(|outcome| outcome.penalty).unwrap_or(0.0)
    }

    fn sum(&self) -> f64 {
        self.per_diem + self.mileage + self.receipt_amount() + self.penalty() + self.efficiency_bonus
    }
}
