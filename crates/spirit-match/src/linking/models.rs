use super::records::{text_field, Record};
use super::report::{LinkOutcome, LinkReport};
use super::LinkConfig;
use crate::matching::{latin_segment, normalize, MatchResult, NameMatcher};
use serde_json::Value;
use tracing::{info, warn};

/// What to do when a name matches several models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmbiguityPolicy {
    /// Link the first match and flag the record for manual review.
    #[default]
    PickFirst,
    /// Emit one copy of the record per matching model.
    EmitAll,
}

/// Fills each record's model reference from the catalog.
pub struct ModelLinker<'m, 'c> {
    matcher: &'m NameMatcher<'c>,
    config: &'m LinkConfig,
    policy: AmbiguityPolicy,
}

impl<'m, 'c> ModelLinker<'m, 'c> {
    pub fn new(
        matcher: &'m NameMatcher<'c>,
        config: &'m LinkConfig,
        policy: AmbiguityPolicy,
    ) -> Self {
        Self {
            matcher,
            config,
            policy,
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

            if text_field(&record, &self.config.model_field).is_some() {
                report.push(&name, LinkOutcome::Skipped, Vec::new());
                linked.push(record);
                continue;
            }

            // an empty key is contained in every catalog stem
            let result = if normalize(latin_segment(&name)).is_empty() {
                None
            } else {
                Some(self.matcher.find_best_matches(&name))
            };

            match result {
                Some(result) if !result.is_empty() => {
                    self.apply(&name, record, &result, &mut linked, &mut report)
                }
                _ => {
                    warn!(name = %name, "no model match found");
                    self.set_path(&mut record, "");
                    report.push(&name, LinkOutcome::Unmatched, Vec::new());
                    linked.push(record);
                }
            }
        }

        info!(
            total = report.total(),
            linked = report.count(LinkOutcome::Linked),
            ambiguous = report.count(LinkOutcome::Ambiguous),
            unmatched = report.count(LinkOutcome::Unmatched),
            skipped = report.count(LinkOutcome::Skipped),
            "model linking finished"
        );
        (linked, report)
    }

    fn apply(
        &self,
        name: &str,
        mut record: Record,
        result: &MatchResult<'c>,
        linked: &mut Vec<Record>,
        report: &mut LinkReport,
    ) {
        let file_names: Vec<String> = result
            .file_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        if !result.is_ambiguous() {
            self.set_path(&mut record, &file_names[0]);
            report.push(name, LinkOutcome::Linked, file_names);
            linked.push(record);
            return;
        }

        match self.policy {
            AmbiguityPolicy::PickFirst => {
                let chosen = &file_names[0];
                warn!(
                    name = %name,
                    candidates = ?file_names,
                    chosen = %chosen,
                    "several models match, defaulting to the first; review manually"
                );
                self.set_path(&mut record, &file_names[0]);
                linked.push(record);
            }
            AmbiguityPolicy::EmitAll => {
                warn!(
                    name = %name,
                    candidates = ?file_names,
                    "several models match, emitting one record per model"
                );
                for file_name in &file_names {
                    let mut copy = record.clone();
                    self.set_path(&mut copy, file_name);
                    linked.push(copy);
                }
            }
        }
        report.push(name, LinkOutcome::Ambiguous, file_names);
    }

    fn set_path(&self, record: &mut Record, file_name: &str) {
        let path = if file_name.is_empty() {
            String::new()
        } else {
            format!("{}{}", self.config.model_url_prefix, file_name)
        };
        record.insert(self.config.model_field.clone(), Value::String(path));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linking::read_records;
    use crate::matching::Catalog;
    use std::io::Cursor;

    fn records(json: &str) -> Vec<Record> {
        read_records(Cursor::new(json)).expect("records parse")
    }

    fn model_catalog() -> Catalog {
        Catalog::from_file_names(["Kappa.glb", "Nurikabe.glb", "Nurikabe2.glb"])
    }

    #[test]
    fn links_single_match() {
        let catalog = model_catalog();
        let matcher = NameMatcher::new(&catalog);
        let config = LinkConfig::default();
        let linker = ModelLinker::new(&matcher, &config, AmbiguityPolicy::PickFirst);

        let (out, report) = linker.link(records(r#"[{"Name":"Kappa (河童)"}]"#));
        assert_eq!(out[0]["Model URL"], "/assets/models/spirits/Kappa.glb");
        assert_eq!(report.count(LinkOutcome::Linked), 1);
    }

    #[test]
    fn pick_first_keeps_one_record() {
        let catalog = model_catalog();
        let matcher = NameMatcher::new(&catalog);
        let config = LinkConfig::default();
        let linker = ModelLinker::new(&matcher, &config, AmbiguityPolicy::PickFirst);

        let (out, report) = linker.link(records(r#"[{"Name":"Nurikabe"}]"#));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["Model URL"], "/assets/models/spirits/Nurikabe.glb");
        assert_eq!(
            report.links[0].candidates,
            vec!["Nurikabe.glb".to_string(), "Nurikabe2.glb".to_string()]
        );
        assert_eq!(report.links[0].outcome, LinkOutcome::Ambiguous);
    }

    #[test]
    fn emit_all_duplicates_record_per_match() {
        let catalog = model_catalog();
        let matcher = NameMatcher::new(&catalog);
        let config = LinkConfig::default();
        let linker = ModelLinker::new(&matcher, &config, AmbiguityPolicy::EmitAll);

        let (out, report) = linker.link(records(r#"[{"Name":"Nurikabe","Type":"Yokai"}]"#));
        let paths: Vec<&str> = out
            .iter()
            .map(|record| record["Model URL"].as_str().expect("path set"))
            .collect();
        assert_eq!(
            paths,
            vec![
                "/assets/models/spirits/Nurikabe.glb",
                "/assets/models/spirits/Nurikabe2.glb"
            ]
        );
        assert!(out.iter().all(|record| record["Type"] == "Yokai"));
        assert_eq!(report.total(), 1);
    }

    #[test]
    fn unmatched_and_blank_names_get_empty_path() {
        let catalog = model_catalog();
        let matcher = NameMatcher::new(&catalog);
        let config = LinkConfig::default();
        let linker = ModelLinker::new(&matcher, &config, AmbiguityPolicy::PickFirst);

        let (out, report) = linker.link(records(r#"[{"Name":"Zzzyyyxxx"},{"Type":"Kami"}]"#));
        assert_eq!(out[0]["Model URL"], "");
        assert_eq!(out[1]["Model URL"], "");
        assert_eq!(report.count(LinkOutcome::Unmatched), 2);
        assert_eq!(report.unmatched().count(), 2);
    }

    #[test]
    fn names_without_latin_key_stay_unmatched_under_both_policies() {
        let catalog =
            Catalog::from_file_names(["Kappa.glb", "Nurikabe.glb", "Oni.glb", "Tengu.glb"]);
        let matcher = NameMatcher::new(&catalog);
        let config = LinkConfig::default();

        for policy in [AmbiguityPolicy::PickFirst, AmbiguityPolicy::EmitAll] {
            let linker = ModelLinker::new(&matcher, &config, policy);
            let input = r#"[{"Name":"河童"},{"Name":" Kappa"},{"Name":"（天狗）"}]"#;
            let (out, report) = linker.link(records(input));
            assert_eq!(out.len(), 3, "{policy:?}");
            assert!(out.iter().all(|record| record["Model URL"] == ""), "{policy:?}");
            assert_eq!(report.count(LinkOutcome::Unmatched), 3, "{policy:?}");
            assert!(report.links.iter().all(|link| link.candidates.is_empty()));
        }
    }

    #[test]
    fn existing_model_reference_is_kept() {
        let catalog = model_catalog();
        let matcher = NameMatcher::new(&catalog);
        let config = LinkConfig::default();
        let linker = ModelLinker::new(&matcher, &config, AmbiguityPolicy::EmitAll);

        let (out, report) = linker.link(records(
            r#"[{"Name":"Nurikabe","Model URL":"/assets/models/spirits/Custom.glb"}]"#,
        ));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["Model URL"], "/assets/models/spirits/Custom.glb");
        assert_eq!(report.count(LinkOutcome::Skipped), 1);
    }
}
