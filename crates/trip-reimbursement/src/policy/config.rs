use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// Name of the only boolean parameter. It is exposed through the numeric accessors as
/// `1.0` / `0.0` so calibration can toggle it like any other tunable.
pub const VACATION_PENALTY_ENABLED: &str = "vacation_penalty_enabled";

macro_rules! policy_parameters {
    ($( $(#[doc = $doc:literal])* $name:ident = $default:expr; )+) => {
        /// Immutable snapshot of every tunable used by the policy engine.
        ///
        /// Field names double as the parameter names used in policy files and calibration
        /// grids.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        pub struct PolicyConfig {
            /// Enables the vacation-penalty path for long, high-spend trips.
            pub vacation_penalty_enabled: bool,
            $( $(#[doc = $doc])* pub $name: f64, )+
        }

        impl Default for PolicyConfig {
            fn default() -> Self {
                Self {
                    vacation_penalty_enabled: true,
                    $( $name: $default, )+
                }
            }
        }

        const NUMERIC_PARAMETERS: &[&str] = &[$( stringify!($name), )+];

        impl PolicyConfig {
            fn numeric(&self, name: &str) -> Option<f64> {
                match name {
                    $( stringify!($name) => Some(self.$name), )+
                    _ => None,
                }
            }

            fn numeric_mut(&mut self, name: &str) -> Option<&mut f64> {
                match name {
                    $( stringify!($name) => Some(&mut self.$name), )+
                    _ => None,
                }
            }
        }
    };
}

policy_parameters! {
    /// Receipts above this switch the extreme single-day rule to its receipt-only formula.
    extreme_day_receipt_threshold = 1600.0;
    extreme_day_high_receipt_pct = 0.5;
    extreme_day_low_receipt_multiplier = 0.6;

    /// Minimum duration for the vacation penalty.
    vacation_penalty_duration_threshold = 8.0;
    /// Average daily spend above which a long trip counts as a vacation.
    vacation_penalty_spend_threshold = 150.0;
    vacation_penalty_per_diem_pct = 0.65;
    vacation_penalty_receipt_pct = 0.45;

    /// Minimum duration routed through the long-trip rule.
    long_trip_duration_threshold = 20.0;
    per_diem_rate_long_trip = 50.0;
    receipt_cap_long_trip_low = 120.0;
    receipt_cap_long_trip_high = 130.0;
    /// Average daily spend above which the high long-trip cap applies.
    high_spend_threshold = 140.0;
    /// Long-trip rate for receipts below the sweet-spot band.
    receipt_tier_1_percentage = 0.6;
    /// Long-trip rate for receipts above the sweet-spot band.
    receipt_tier_2_percentage = 0.2;

    per_diem_base_rate = 100.0;
    per_diem_rate_10_plus_days = 70.0;
    per_diem_rate_14_plus_days = 55.0;
    per_diem_floor_duration = 15.0;
    per_diem_floor_rate = 60.0;

    mileage_rate_primary = 0.58;
    mileage_rate_tier_1 = 0.45;
    mileage_rate_tier_2 = 0.40;
    mileage_rate_tier_3 = 0.40;
    mileage_breakpoint_1 = 650.0;
    mileage_breakpoint_2 = 800.0;

    /// Bonus per mile-per-day above 150 inside the efficiency band.
    eff_slope = 0.4;
    /// Magnitude of the penalty for very low or very high daily mileage.
    eff_penalty = 50.0;

    short_trip_high_receipt_pct = 0.5;
    one_day_high_receipt_multiplier = 0.5;
    one_day_upper_tier_threshold = 800.0;
    one_day_upper_tier_multiplier = 0.6;
    two_day_high_receipt_multiplier = 0.5;
    two_day_upper_tier_threshold = 800.0;
    two_day_upper_tier_multiplier = 0.7;
    /// Daily receipt ceiling for 4-6 day trips.
    receipt_cap_4_6_days = 250.0;
    receipt_low_tier_threshold = 20.0;
    receipt_low_tier_pct = 0.0;
    standard_receipt_pct = 0.4;
    standard_receipt_pct_1_3_days = 0.55;
    standard_receipt_pct_4_6_days = 0.6;
    receipt_sweet_spot_lower_bound = 600.0;
    receipt_sweet_spot_upper_bound = 850.0;
    receipt_sweet_spot_pct = 0.95;
    /// Rate for the portion of receipts above the sweet-spot band.
    high_cost_receipt_percentage = 0.25;
    /// Magnitude of the flat penalty for trips with 0 < receipts <= 20.
    small_receipt_penalty = 50.0;
}

/// Value accepted for a parameter in a policy file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Flag(bool),
    Number(f64),
}

impl ParameterValue {
    pub fn as_f64(self) -> f64 {
        match self {
            ParameterValue::Flag(true) => 1.0,
            ParameterValue::Flag(false) => 0.0,
            ParameterValue::Number(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown policy parameter '{0}'")]
pub struct UnknownParameter(pub String);

/// Errors raised while loading a policy override file.
#[derive(Debug, thiserror::Error)]
pub enum PolicyLoadError {
    #[error("failed to read policy file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid policy JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("policy parameter '{name}' must be a finite number, found {value}")]
    NonFinite { name: String, value: f64 },
}

impl PolicyConfig {
    /// Every parameter name in schema order, flag first.
    pub fn parameter_names() -> impl Iterator<Item = &'static str> {
        std::iter::once(VACATION_PENALTY_ENABLED).chain(NUMERIC_PARAMETERS.iter().copied())
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        if name == VACATION_PENALTY_ENABLED {
            return Some(if self.vacation_penalty_enabled { 1.0 } else { 0.0 });
        }
        self.numeric(name)
    }

    /// Returns a copy with `name` set to `value`; `self` is left untouched.
    pub fn with(&self, name: &str, value: f64) -> Result<PolicyConfig, UnknownParameter> {
        let mut next = self.clone();
        if name == VACATION_PENALTY_ENABLED {
            next.vacation_penalty_enabled = value != 0.0;
            return Ok(next);
        }
        match next.numeric_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(next)
            }
            None => Err(UnknownParameter(name.to_string())),
        }
    }

    /// Builds a config from defaults plus a flat override mapping. Unknown names are
    /// logged and skipped.
    pub fn from_overrides<'a, I>(overrides: I) -> Result<PolicyConfig, PolicyLoadError>
    where
        I: IntoIterator<Item = (&'a String, &'a ParameterValue)>,
    {
        let mut config = PolicyConfig::default();
        for (name, value) in overrides {
            let value = value.as_f64();
            if !value.is_finite() {
                return Err(PolicyLoadError::NonFinite {
                    name: name.clone(),
                    value,
                });
            }
            match config.with(name, value) {
                Ok(next) => config = next,
                Err(unknown) => warn!(parameter = %unknown.0, "ignoring unknown policy parameter"),
            }
        }
        Ok(config)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<PolicyConfig, PolicyLoadError> {
        let overrides: BTreeMap<String, ParameterValue> = serde_json::from_reader(reader)?;
        Self::from_overrides(&overrides)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<PolicyConfig, PolicyLoadError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Flat name to value mapping, sorted by name.
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        Self::parameter_names()
            .filter_map(|name| self.get(name).map(|value| (name, value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_parameter() {
        let config = PolicyConfig::default();
        let names: Vec<_> = PolicyConfig::parameter_names().collect();
        assert_eq!(names.len(), NUMERIC_PARAMETERS.len() + 1);
        assert!(names.iter().all(|name| config.get(name).is_some()));
        assert_eq!(config.get("per_diem_base_rate"), Some(100.0));
        assert_eq!(config.get(VACATION_PENALTY_ENABLED), Some(1.0));
    }

    #[test]
    fn with_returns_new_snapshot() {
        let base = PolicyConfig::default();
        let tuned = base.with("eff_slope", 0.6).expect("known parameter");
        assert_eq!(tuned.eff_slope, 0.6);
        assert_eq!(base.eff_slope, 0.4);

        let disabled = base.with(VACATION_PENALTY_ENABLED, 0.0).expect("flag known");
        assert!(!disabled.vacation_penalty_enabled);
    }

    #[test]
    fn with_rejects_unknown_names() {
        let err = PolicyConfig::default()
            .with("per_diem_rate_mars", 1.0)
            .expect_err("unknown parameter");
        assert_eq!(err, UnknownParameter("per_diem_rate_mars".to_string()));
    }

    #[test]
    fn reader_applies_overrides_and_keeps_defaults() {
        let json = r#"{
            "per_diem_rate_10_plus_days": 75,
            "vacation_penalty_enabled": false,
            "not_a_parameter": 3
        }"#;
        let config = PolicyConfig::from_reader(json.as_bytes()).expect("policy parses");
        assert_eq!(config.per_diem_rate_10_plus_days, 75.0);
        assert!(!config.vacation_penalty_enabled);
        assert_eq!(config.mileage_breakpoint_1, 650.0);
    }

    #[test]
    fn reader_rejects_non_numeric_values() {
        let json = r#"{ "eff_slope": "steep" }"#;
        let err = PolicyConfig::from_reader(json.as_bytes()).expect_err("string rejected");
        assert!(matches!(err, PolicyLoadError::Json(_)));
    }

    #[test]
    fn to_map_round_trips_through_overrides() {
        let tuned = PolicyConfig::default()
            .with("mileage_rate_tier_3", 0.31)
            .expect("known parameter");
        let map: BTreeMap<String, ParameterValue> = tuned
            .to_map()
            .into_iter()
            .map(|(name, value)| (name.to_string(), ParameterValue::Number(value)))
            .collect();
        let restored = PolicyConfig::from_overrides(&map).expect("restores");
        assert_eq!(restored, tuned);
    }
}
