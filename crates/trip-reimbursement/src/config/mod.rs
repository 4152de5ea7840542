use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::policy::{PolicyConfig, PolicyLoadError};

const DEFAULT_LOG_LEVEL: &str = "warn";

/// Top-level configuration for the reimbursement tools.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub policy: PolicySource,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let log_level =
            env::var("REIMBURSE_LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
        if log_level.trim().is_empty() {
            return Err(ConfigError::EmptyLogLevel);
        }

        let policy = match env::var("REIMBURSE_POLICY_PATH") {
            Ok(path) if path.trim().is_empty() => return Err(ConfigError::EmptyPolicyPath),
            Ok(path) => PolicySource::File(PathBuf::from(path.trim())),
            Err(_) => PolicySource::Defaults,
        };

        Ok(Self {
            policy,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where the policy snapshot comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicySource {
    Defaults,
    File(PathBuf),
}

impl PolicySource {
    pub fn load(&self) -> Result<PolicyConfig, PolicyLoadError> {
        match self {
            PolicySource::Defaults => Ok(PolicyConfig::default()),
            PolicySource::File(path) => PolicyConfig::from_path(path),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyLogLevel,
    EmptyPolicyPath,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyLogLevel => write!(f, "REIMBURSE_LOG_LEVEL must not be empty"),
            ConfigError::EmptyPolicyPath => {
                write!(f, "REIMBURSE_POLICY_PATH must name a policy file when set")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("REIMBURSE_LOG_LEVEL");
        env::remove_var("REIMBURSE_POLICY_PATH");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.policy, PolicySource::Defaults);
        assert_eq!(config.telemetry.log_level, "warn");
    }

    #[test]
    fn policy_path_comes_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("REIMBURSE_POLICY_PATH", " calibrated.json ");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.policy,
            PolicySource::File(PathBuf::from("calibrated.json"))
        );
        reset_env();
    }

    #[test]
    fn rejects_blank_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("REIMBURSE_LOG_LEVEL", "  ");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::EmptyLogLevel)
        ));
        reset_env();
        env::set_var("REIMBURSE_POLICY_PATH", "");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::EmptyPolicyPath)
        ));
        reset_env();
    }
}
