use super::config::PolicyConfig;
use super::domain::TripInput;

/// Tiered daily allowance with a minimum guarantee for very long trips.
pub(crate) fn per_diem_total(trip: &TripInput, config: &PolicyConfig) -> f64 {
    let duration = trip.duration_days();
    let rate = if duration > 13 {
        config.per_diem_rate_14_plus_days
    } else if duration >= 10 {
        config.per_diem_rate_10_plus_days
    } else {
        config.per_diem_base_rate
    };

    let total = trip.days() * rate;
    if trip.days() >= config.per_diem_floor_duration {
        total.max(trip.days() * config.per_diem_floor_rate)
    } else {
        total
    }
}

/// Flat long-trip allowance. The tiered schedule and floor do not apply.
pub(crate) fn long_trip_per_diem(trip: &TripInput, config: &PolicyConfig) -> f64 {
    trip.days() * config.per_diem_rate_long_trip
}
