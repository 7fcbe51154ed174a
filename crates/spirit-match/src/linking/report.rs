use super::LinkError;
use serde::Serialize;
use std::io::Write;

/// What happened to one input record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkOutcome {
    Linked,
    FuzzyLinked,
    Ambiguous,
    Unmatched,
    Skipped,
}

/// Per-record detail kept for the run summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordLink {
    pub name: String,
    pub outcome: LinkOutcome,
    pub candidates: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkReport {
    pub links: Vec<RecordLink>,
}

impl LinkReport {
    pub(crate) fn push(&mut self, name: &str, outcome: LinkOutcome, candidates: Vec<String>) {
        self.links.push(RecordLink {
            name: name.to_string(),
            outcome,
            candidates,
        });
    }

    pub fn count(&self, outcome: LinkOutcome) -> usize {
        self.links
            .iter()
            .filter(|link| link.outcome == outcome)
            .count()
    }

    /// Records that received a reference path, fuzzy or not.
    pub fn matched(&self) -> usize {
        self.count(LinkOutcome::Linked)
            + self.count(LinkOutcome::FuzzyLinked)
            + self.count(LinkOutcome::Ambiguous)
    }

    pub fn total(&self) -> usize {
        self.links.len()
    }

    pub fn unmatched(&self) -> impl Iterator<Item = &RecordLink> {
        self.links
            .iter()
            .filter(|link| link.outcome == LinkOutcome::Unmatched)
    }

    /// Writes the run summary as pretty JSON for manual review.
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<(), LinkError> {
        let document = ReportDocument {
            total: self.total(),
            matched: self.matched(),
            ambiguous: self.count(LinkOutcome::Ambiguous),
            unmatched: self.count(LinkOutcome::Unmatched),
            skipped: self.count(LinkOutcome::Skipped),
            links: &self.links,
        };
        serde_json::to_writer_pretty(&mut writer, &document)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct ReportDocument<'r> {
    total: usize,
    matched: usize,
    ambiguous: usize,
    unmatched: usize,
    skipped: usize,
    links: &'r [RecordLink],
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn json_summary_lists_counts_and_outcomes() {
        let mut report = LinkReport::default();
        report.push("Kappa", LinkOutcome::Linked, vec!["Kappa.glb".to_string()]);
        report.push(
            "Nurikabe",
            LinkOutcome::Ambiguous,
            vec!["Nurikabe.glb".to_string(), "Nurikabe2.glb".to_string()],
        );
        report.push("Zzzyyyxxx", LinkOutcome::Unmatched, Vec::new());

        let mut out = Vec::new();
        report.write_json(&mut out).expect("report written");
        let document: Value = serde_json::from_slice(&out).expect("valid json");

        assert_eq!(document["total"], 3);
        assert_eq!(document["matched"], 2);
        assert_eq!(document["ambiguous"], 1);
        assert_eq!(document["unmatched"], 1);
        assert_eq!(document["skipped"], 0);
        assert_eq!(
            document["links"][1],
            json!({
                "name": "Nurikabe",
                "outcome": "ambiguous",
                "candidates": ["Nurikabe.glb", "Nurikabe2.glb"]
            })
        );
        assert_eq!(document["links"][2]["outcome"], "unmatched");
    }
}
