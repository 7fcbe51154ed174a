pub mod config;
pub mod error;
pub mod linking;
pub mod matching;
pub mod telemetry;
