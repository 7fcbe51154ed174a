use crate::linking::LinkConfig;
use crate::matching::{FallbackScope, MatchSettings};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Distinguishes runtime behavior for different stages of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the asset tools.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub matching: MatchSettings,
    pub links: LinkConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let defaults = MatchSettings::default();
        let matching = MatchSettings {
            max_distance: parse_var("MATCH_MAX_DISTANCE", defaults.max_distance)?,
            fallback_cutoff: parse_ratio("MATCH_FALLBACK_CUTOFF", defaults.fallback_cutoff)?,
            fallback_limit: parse_var("MATCH_FALLBACK_LIMIT", defaults.fallback_limit)?,
            fallback_scope: parse_scope()?,
        };

        let link_defaults = LinkConfig::default();
        let links = LinkConfig {
            model_url_prefix: env::var("MODEL_URL_PREFIX")
                .unwrap_or(link_defaults.model_url_prefix),
            image_url_prefix: env::var("IMAGE_URL_PREFIX")
                .unwrap_or(link_defaults.image_url_prefix),
            image_cutoff: parse_ratio("IMAGE_MATCH_CUTOFF", link_defaults.image_cutoff)?,
            ..link_defaults
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            matching,
            links,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { name, value: raw }),
        Err(_) => Ok(default),
    }
}

fn parse_ratio(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    let value = parse_var(name, default)?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::RatioOutOfRange { name, value })
    }
}

fn parse_scope() -> Result<FallbackScope, ConfigError> {
    match env::var("MATCH_FALLBACK_SCOPE") {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(FallbackScope::FirstCandidate),
            "all" => Ok(FallbackScope::AllCandidates),
            _ => Err(ConfigError::InvalidScope(raw)),
        },
        Err(_) => Ok(FallbackScope::default()),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber { name: &'static str, value: String },
    RatioOutOfRange { name: &'static str, value: f64 },
    InvalidScope(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { name, value } => {
                write!(f, "{name} must be a number, got '{value}'")
            }
            ConfigError::RatioOutOfRange { name, value } => {
                write!(f, "{name} must lie between 0 and 1, got {value}")
            }
            ConfigError::InvalidScope(value) => {
                write!(f, "MATCH_FALLBACK_SCOPE must be 'first' or 'all', got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
