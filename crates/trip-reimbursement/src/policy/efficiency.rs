use super::config::PolicyConfig;
use super::domain::TripInput;

const LOW_EFFICIENCY_MPD: f64 = 100.0;
const BONUS_FLOOR_MPD: f64 = 150.0;
const BONUS_CEILING_MPD: f64 = 250.0;
const HIGH_EFFICIENCY_MPD: f64 = 300.0;

/// Rewards moderate miles-per-day and penalizes both extremes.
pub(crate) fn efficiency_bonus(trip: &TripInput, config: &PolicyConfig) -> f64 {
    if trip.duration_days() == 0 {
        return 0.0;
    }

    let mpd = trip.miles_per_day();
    if (BONUS_FLOOR_MPD..=BONUS_CEILING_MPD).contains(&mpd) {
        (mpd - BONUS_FLOOR_MPD) * config.eff_slope
    } else if !(LOW_EFFICIENCY_MPD..=HIGH_EFFICIENCY_MPD).contains(&mpd) {
        -config.eff_penalty
    } else {
        0.0
    }
}
