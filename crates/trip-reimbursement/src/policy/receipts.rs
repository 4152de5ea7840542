use super::config::PolicyConfig;
use super::domain::{ReceiptPath, TripInput};
use super::tariff::{bands_from_breakpoints, progressive};

/// Daily ceiling for 1-3 day trips. Not tunable.
pub(crate) const SHORT_TRIP_DAILY_CAP: f64 = 75.0;
/// Receipt totals at or below this (but above zero) incur the small-receipt penalty.
pub(crate) const SMALL_RECEIPT_LIMIT: f64 = 20.0;

const SHORT_TRIP_MAX_DAYS: u32 = 4;
const SHORT_TRIP_RECEIPT_THRESHOLD: f64 = 1000.0;
const HIGH_RECEIPT_THRESHOLD: f64 = 500.0;

/// Receipt component with the signed penalty that accompanies it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ReceiptOutcome {
    pub amount: f64,
    pub penalty: f64,
    pub path: ReceiptPath,
}

impl ReceiptOutcome {
    fn unpenalized(amount: f64, path: ReceiptPath) -> Self {
        Self {
            amount,
            penalty: 0.0,
            path,
        }
    }
}

/// General receipt formula used by the standard path.
pub(crate) fn standard_receipts(trip: &TripInput, config: &PolicyConfig) -> ReceiptOutcome {
    let duration = trip.duration_days();
    let receipts = trip.total_receipts_amount();

    if duration <= SHORT_TRIP_MAX_DAYS && receipts > SHORT_TRIP_RECEIPT_THRESHOLD {
        return ReceiptOutcome::unpenalized(
            receipts * config.short_trip_high_receipt_pct,
            ReceiptPath::ShortTripHighReceipt,
        );
    }

    if duration == 1 && receipts > HIGH_RECEIPT_THRESHOLD {
        return if receipts > config.one_day_upper_tier_threshold {
            ReceiptOutcome::unpenalized(
                receipts * config.one_day_upper_tier_multiplier,
                ReceiptPath::OneDayUpperTier,
            )
        } else {
            ReceiptOutcome::unpenalized(
                receipts * config.one_day_high_receipt_multiplier,
                ReceiptPath::OneDayHighReceipt,
            )
        };
    }

    if duration == 2 && receipts > HIGH_RECEIPT_THRESHOLD {
        return if receipts > config.two_day_upper_tier_threshold {
            ReceiptOutcome::unpenalized(
                receipts * config.two_day_upper_tier_multiplier,
                ReceiptPath::TwoDayUpperTier,
            )
        } else {
            ReceiptOutcome::unpenalized(
                receipts * config.two_day_high_receipt_multiplier,
                ReceiptPath::TwoDayHighReceipt,
            )
        };
    }

    let (base, path) = match daily_cap(duration, config) {
        Some(cap) if cap > 0.0 && trip.daily_spend() > cap => {
            (cap * trip.days(), ReceiptPath::DailyCapApplied)
        }
        _ => (receipts, ReceiptPath::Tiered),
    };

    let bands = bands_from_breakpoints(
        &[
            config.receipt_low_tier_threshold.max(0.0),
            config.receipt_sweet_spot_lower_bound,
            config.receipt_sweet_spot_upper_bound,
        ],
        &[
            config.receipt_low_tier_pct,
            standard_rate(duration, config),
            config.receipt_sweet_spot_pct,
            config.high_cost_receipt_percentage,
        ],
    );

    ReceiptOutcome {
        amount: progressive(base, &bands),
        penalty: small_receipt_penalty(receipts, config),
        path,
    }
}

/// Capped three-segment schedule used by the long-trip path.
pub(crate) fn long_trip_receipts(trip: &TripInput, config: &PolicyConfig) -> ReceiptOutcome {
    let cap_per_day = if trip.daily_spend() > config.high_spend_threshold {
        config.receipt_cap_long_trip_high
    } else {
        config.receipt_cap_long_trip_low
    };
    let cap = cap_per_day * trip.days();

    let receipts = trip.total_receipts_amount();
    let (base, path) = if receipts > cap {
        (cap, ReceiptPath::LongTripCapApplied)
    } else {
        (receipts, ReceiptPath::LongTripTiered)
    };

    let bands = bands_from_breakpoints(
        &[
            config.receipt_sweet_spot_lower_bound,
            config.receipt_sweet_spot_upper_bound,
        ],
        &[
            config.receipt_tier_1_percentage,
            config.receipt_sweet_spot_pct,
            config.receipt_tier_2_percentage,
        ],
    );

    ReceiptOutcome::unpenalized(progressive(base, &bands), path)
}

/// Flat fraction of raw receipts used by the vacation-penalty path.
pub(crate) fn vacation_receipts(trip: &TripInput, config: &PolicyConfig) -> ReceiptOutcome {
    ReceiptOutcome::unpenalized(
        trip.total_receipts_amount() * config.vacation_penalty_receipt_pct,
        ReceiptPath::VacationFlat,
    )
}

fn daily_cap(duration: u32, config: &PolicyConfig) -> Option<f64> {
    match duration {
        1..=3 => Some(SHORT_TRIP_DAILY_CAP),
        4..=6 => Some(config.receipt_cap_4_6_days),
        _ => None,
    }
}

fn standard_rate(duration: u32, config: &PolicyConfig) -> f64 {
    match duration {
        1..=3 => config.standard_receipt_pct_1_3_days,
        4..=6 => config.standard_receipt_pct_4_6_days,
        _ => config.standard_receipt_pct,
    }
}

fn small_receipt_penalty(receipts: f64, config: &PolicyConfig) -> f64 {
    if receipts > 0.0 && receipts <= SMALL_RECEIPT_LIMIT {
        -config.small_receipt_penalty
    } else {
        0.0
    }
}
