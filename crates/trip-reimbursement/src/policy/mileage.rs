use super::config::PolicyConfig;
use super::tariff::{bands_from_breakpoints, progressive};

/// Distance covered by the primary mileage rate.
pub(crate) const PRIMARY_TIER_MILES: f64 = 100.0;

/// Progressive mileage tariff: each rate applies only to the miles inside its tier.
pub(crate) fn mileage_total(miles: f64, config: &PolicyConfig) -> f64 {
    let bands = bands_from_breakpoints(
        &[
            PRIMARY_TIER_MILES,
            config.mileage_breakpoint_1,
            config.mileage_breakpoint_2,
        ],
        &[
            config.mileage_rate_primary,
            config.mileage_rate_tier_1,
            config.mileage_rate_tier_2,
            config.mileage_rate_tier_3,
        ],
    );
    progressive(miles, &bands)
}
