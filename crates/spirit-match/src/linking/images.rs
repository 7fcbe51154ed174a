use super::records::{text_field, Record};
use super::report::{LinkOutcome, LinkReport};
use super::LinkConfig;
use crate::matching::{close_matches, normalize, Catalog, CatalogEntry};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Fills each record's image reference, keyed by its model file or name.
pub struct ImageLinker<'c> {
    config: &'c LinkConfig,
    keys: Vec<String>,
    entries: Vec<&'c CatalogEntry>,
    index: HashMap<String, usize>,
}

impl<'c> ImageLinker<'c> {
    pub fn new(catalog: &'c Catalog, config: &'c LinkConfig) -> Self {
        let mut keys = Vec::new();
        let mut entries = Vec::new();
        let mut index = HashMap::new();

        for entry in catalog.entries() {
            let key = normalize(&entry.stem);
            match index.get(&key) {
                // later files replace earlier ones with the same key
                Some(&slot) => entries[slot] = entry,
                None => {
                    index.insert(key.clone(), keys.len());
                    keys.push(key);
                    entries.push(entry);
                }
            }
        }

        Self {
            config,
            keys,
            entries,
            index,
        }
    }

    pub fn link(&self, records: Vec<Record>) -> (Vec<Record>, LinkReport) {
        let mut report = LinkReport::default();
        let mut linked = Vec::with_capacity(records.len());

        for mut record in records {
            let name = record
                .get(&self.config.name_field)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();

            let Some(base) = self.lookup_base(&record) else {
                warn!(name = %name, "record has neither model reference nor name");
                report.push(&name, LinkOutcome::Unmatched, Vec::new());
                linked.push(record);
                continue;
            };

            let key = normalize(&base);
            let (slot, outcome) = match self.index.get(&key) {
                Some(&slot) => (Some(slot), LinkOutcome::Linked),
                None => {
                    let hit = close_matches(&key, &self.keys, 1, self.config.image_cutoff)
                        .first()
                        .map(|(slot, _)| *slot);
                    (hit, LinkOutcome::FuzzyLinked)
                }
            };

            match slot {
                Some(slot) => {
                    let file_name = &self.entries[slot].file_name;
                    if outcome == LinkOutcome::FuzzyLinked {
                        info!(base = %base, file = %file_name, "fuzzy image match");
                    }
                    record.insert(
                        self.config.image_field.clone(),
                        Value::String(format!("{}{}", self.config.image_url_prefix, file_name)),
                    );
                    report.push(&name, outcome, vec![file_name.clone()]);
                }
                None => {
                    warn!(base = %base, "no image found");
                    report.push(&name, LinkOutcome::Unmatched, Vec::new());
                }
            }
            linked.push(record);
        }

        info!(
            total = report.total(),
            matched = report.matched(),
            unmatched = report.count(LinkOutcome::Unmatched),
            "image linking finished"
        );
        (linked, report)
    }

    /// Model file stem when a model is linked, otherwise the display name.
    fn lookup_base(&self, record: &Record) -> Option<String> {
        if let Some(url) = text_field(record, &self.config.model_field) {
            let file_name = url.rsplit('/').next().unwrap_or(url);
            let stem = Path::new(file_name)
                .file_stem()
                .and_then(|stem| stem.to_str())
                .filter(|stem| !stem.is_empty());
            if let Some(stem) = stem {
                return Some(stem.to_string());
            }
        }
        text_field(record, &self.config.name_field).map(str::to_string)
    }
}
