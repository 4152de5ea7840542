use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Crates whose events the configured log level applies to. Everything else stays at `warn`.
const SCOPED_TARGETS: [&str; 2] = ["trip_reimbursement", "trip_reimbursement_cli"];

#[derive(Debug)]
pub enum TelemetryError {
    InvalidFilter { directive: String, source: ParseError },
    AlreadyInstalled(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidFilter { directive, .. } => {
                write!(f, "invalid log filter '{directive}'")
            }
            TelemetryError::AlreadyInstalled(err) => {
                write!(f, "log subscriber already installed: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidFilter { source, .. } => Some(source),
            TelemetryError::AlreadyInstalled(err) => Some(&**err),
        }
    }
}

/// Expands a bare level such as `debug` into per-crate directives. Values that already look
/// like filter directives are passed through untouched.
pub fn filter_directive(log_level: &str) -> String {
    let level = log_level.trim();
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }

    let mut directive = String::from("warn");
    for target in SCOPED_TARGETS {
        directive.push_str(&format!(",{target}={level}"));
    }
    directive
}

fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let directive = filter_directive(&config.log_level);
    EnvFilter::try_new(&directive)
        .map_err(|source| TelemetryError::InvalidFilter { directive, source })
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured level. Logs go to
/// stderr; stdout is reserved for amounts and reports.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = build_filter(config)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_is_scoped_to_reimbursement_crates() {
        assert_eq!(
            filter_directive(" debug "),
            "warn,trip_reimbursement=debug,trip_reimbursement_cli=debug"
        );
    }

    #[test]
    fn explicit_directives_pass_through() {
        assert_eq!(filter_directive("info,csv=trace"), "info,csv=trace");
        assert_eq!(
            filter_directive("trip_reimbursement=trace"),
            "trip_reimbursement=trace"
        );
    }

    #[test]
    fn scoped_directive_parses() {
        assert!(EnvFilter::try_new(filter_directive("info")).is_ok());
    }
}
