use crate::config::ConfigError;
use crate::linking::LinkError;
use crate::telemetry::TelemetryError;

/// Failures surfaced by the command-line tools. Matching itself cannot fail.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("linking error: {0}")]
    Link(#[from] LinkError),
}
