use crate::calibration::CalibrationError;
use crate::config::ConfigError;
use crate::harness::CaseLoadError;
use crate::policy::PolicyLoadError;
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Policy(PolicyLoadError),
    Cases(CaseLoadError),
    Calibration(CalibrationError),
    Output(csv::Error),
    Json(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Policy(err) => write!(f, "policy error: {}", err),
            AppError::Cases(err) => write!(f, "reference case error: {}", err),
            AppError::Calibration(err) => write!(f, "calibration error: {}", err),
            AppError::Output(err) => write!(f, "output error: {}", err),
            AppError::Json(err) => write!(f, "serialization error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Policy(err) => Some(err),
            AppError::Cases(err) => Some(err),
            AppError::Calibration(err) => Some(err),
            AppError::Output(err) => Some(err),
            AppError::Json(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<PolicyLoadError> for AppError {
    fn from(value: PolicyLoadError) -> Self {
        Self::Policy(value)
    }
}

impl From<CaseLoadError> for AppError {
    fn from(value: CaseLoadError) -> Self {
        Self::Cases(value)
    }
}

impl From<CalibrationError> for AppError {
    fn from(value: CalibrationError) -> Self {
        Self::Calibration(value)
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        Self::Output(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
