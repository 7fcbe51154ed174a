//! Annotates spirit records with reference paths to matched asset files.

mod images;
mod models;
mod records;
mod report;

pub use images::ImageLinker;
pub use models::{AmbiguityPolicy, ModelLinker};
pub use records::{read_records, write_records, Record};
pub use report::{LinkOutcome, LinkReport, RecordLink};

/// Field names and path prefixes used when annotating records.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkConfig {
    pub name_field: String,
    pub model_field: String,
    pub image_field: String,
    pub model_url_prefix: String,
    pub image_url_prefix: String,
    /// Minimum similarity for a fuzzy image hit.
    pub image_cutoff: f64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            name_field: "Name".to_string(),
            model_field: "Model URL".to_string(),
            image_field: "Image URL".to_string(),
            model_url_prefix: "/assets/models/spirits/".to_string(),
            image_url_prefix: "/assets/images/spirits/".to_string(),
            image_cutoff: 0.7,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("failed to read or write records: {0}")]
    Io(#[from] std::io::Error),
    #[error("records must be a JSON array of objects: {0}")]
    Json(#[from] serde_json::Error),
}
