use crate::policy::{PolicyConfig, PolicyEngine, TripInput};

pub(super) fn engine() -> PolicyEngine {
    PolicyEngine::new(PolicyConfig::default())
}

pub(super) fn engine_with(overrides: &[(&str, f64)]) -> PolicyEngine {
    let config = overrides
        .iter()
        .fold(PolicyConfig::default(), |config, (name, value)| {
            config.with(name, *value).expect("known parameter")
        });
    PolicyEngine::new(config)
}

pub(super) fn trip(duration_days: i64, miles: f64, receipts: f64) -> TripInput {
    TripInput::new(duration_days, miles, receipts)
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
