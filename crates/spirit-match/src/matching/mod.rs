//! Fuzzy matching of display names against an asset catalog.
//!
//! A display name is expanded into normalized candidate keys, each key is
//! compared against every normalized catalog stem, and any entry within edit
//! distance or in a substring relation is reported. When nothing qualifies a
//! similarity-ratio search supplies the nearest few entries instead.

mod candidates;
mod catalog;
mod distance;
mod normalizer;

pub use candidates::{latin_segment, CandidateSet};
pub use catalog::{canonical_export_stem, Catalog, CatalogEntry};
pub use distance::{close_matches, levenshtein_distance, similarity_ratio};
pub use normalizer::normalize;

use std::collections::BTreeSet;
use tracing::trace;

/// Which display-name keys feed the similarity fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackScope {
    /// Only the key derived from the bare latin segment.
    #[default]
    FirstCandidate,
    /// Every generated key; an entry keeps its best score.
    AllCandidates,
}

/// Thresholds applied by [`NameMatcher`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchSettings {
    pub max_distance: usize,
    pub fallback_cutoff: f64,
    pub fallback_limit: usize,
    pub fallback_scope: FallbackScope,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            max_distance: 2,
            fallback_cutoff: 0.6,
            fallback_limit: 3,
            fallback_scope: FallbackScope::FirstCandidate,
        }
    }
}

/// How a [`MatchResult`] was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    Candidates,
    Similarity,
    None,
}

/// Catalog entries judged to correspond to one display name.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult<'c> {
    entries: Vec<&'c CatalogEntry>,
    source: MatchSource,
}

impl<'c> MatchResult<'c> {
    pub fn entries(&self) -> &[&'c CatalogEntry] {
        &self.entries
    }

    pub fn source(&self) -> MatchSource {
        self.source
    }

    pub fn first(&self) -> Option<&'c CatalogEntry> {
        self.entries.first().copied()
    }

    pub fn stems(&self) -> Vec<&'c str> {
        self.entries.iter().map(|entry| entry.stem.as_str()).collect()
    }

    pub fn file_names(&self) -> Vec<&'c str> {
        self.entries
            .iter()
            .map(|entry| entry.file_name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_ambiguous(&self) -> bool {
        self.entries.len() > 1
    }
}

/// Matches display names against one catalog snapshot.
///
/// Normalized catalog keys are computed once at construction; every lookup
/// is read-only, so a matcher can be shared across threads.
#[derive(Debug, Clone)]
pub struct NameMatcher<'c> {
    catalog: &'c Catalog,
    normalized: Vec<String>,
    settings: MatchSettings,
}

impl<'c> NameMatcher<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self::with_settings(catalog, MatchSettings::default())
    }

    pub fn with_settings(catalog: &'c Catalog, settings: MatchSettings) -> Self {
        let normalized = catalog
            .entries()
            .iter()
            .map(|entry| normalize(&entry.stem))
            .collect();
        Self {
            catalog,
            normalized,
            settings,
        }
    }

    pub fn find_best_matches(&self, display_name: &str) -> MatchResult<'c> {
        let candidates = CandidateSet::generate(display_name);

        let hits: BTreeSet<usize> = self
            .normalized
            .iter()
            .enumerate()
            .filter(|(_, key)| {
                candidates
                    .keys()
                    .iter()
                    .any(|candidate| self.accepts(candidate, key))
            })
            .map(|(index, _)| index)
            .collect();

        if !hits.is_empty() {
            let mut entries: Vec<&'c CatalogEntry> =
                hits.into_iter().map(|index| self.entry(index)).collect();
            entries.sort_by(|left, right| left.stem.cmp(&right.stem));
            entries.dedup_by(|right, left| right.stem == left.stem);
            return MatchResult {
                entries,
                source: MatchSource::Candidates,
            };
        }

        let entries = self.similarity_fallback(&candidates);
        trace!(
            display_name,
            fallback_hits = entries.len(),
            "no direct candidate match, used similarity fallback"
        );
        let source = if entries.is_empty() {
            MatchSource::None
        } else {
            MatchSource::Similarity
        };
        MatchResult { entries, source }
    }

    fn accepts(&self, candidate: &str, key: &str) -> bool {
        key.contains(candidate)
            || candidate.contains(key)
            || levenshtein_distance(candidate, key) <= self.settings.max_distance
    }

    fn similarity_fallback(&self, candidates: &CandidateSet) -> Vec<&'c CatalogEntry> {
        let queries: &[String] = match self.settings.fallback_scope {
            FallbackScope::FirstCandidate => &candidates.keys()[..1.min(candidates.len())],
            FallbackScope::AllCandidates => candidates.keys(),
        };

        let mut best: Vec<(usize, f64)> = Vec::new();
        for query in queries {
            let hits = close_matches(
                query,
                &self.normalized,
                self.normalized.len(),
                self.settings.fallback_cutoff,
            );
            for (index, score) in hits {
                match best.iter_mut().find(|(seen, _)| *seen == index) {
                    Some(existing) if existing.1 < score => existing.1 = score,
                    Some(_) => {}
                    None => best.push((index, score)),
                }
            }
        }
        best.sort_by(|left, right| right.1.total_cmp(&left.1).then(left.0.cmp(&right.0)));

        let mut entries: Vec<&'c CatalogEntry> = Vec::new();
        for (index, _) in best {
            if entries.len() >= self.settings.fallback_limit {
                break;
            }
            let entry = self.entry(index);
            if !entries.iter().any(|kept| kept.stem == entry.stem) {
                entries.push(entry);
            }
        }
        entries
    }

    fn entry(&self, index: usize) -> &'c CatalogEntry {
        &self.catalog.entries()[index]
    }
}

/// Matches one display name against plain catalog stems with default settings.
pub fn find_best_matches<S: AsRef<str>>(display_name: &str, stems: &[S]) -> Vec<String> {
    let catalog = Catalog::from_stems(stems.iter().map(|stem| stem.as_ref().to_string()));
    NameMatcher::new(&catalog)
        .find_best_matches(display_name)
        .stems()
        .into_iter()
        .map(str::to_string)
        .collect()
}
