use std::path::Path;

/// One asset file known to the matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// File name without its final extension; the identifier used for matching.
    pub stem: String,
    /// File name as found on disk, used to build reference paths.
    pub file_name: String,
}

impl CatalogEntry {
    pub fn from_file_name(file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let stem = Path::new(&file_name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(file_name.as_str())
            .to_string();
        Self { stem, file_name }
    }

    pub fn from_stem(stem: impl Into<String>) -> Self {
        let stem = stem.into();
        Self {
            file_name: stem.clone(),
            stem,
        }
    }
}

/// Ordered, immutable list of asset entries for one matching session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn from_file_names<I, S>(file_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: file_names
                .into_iter()
                .map(CatalogEntry::from_file_name)
                .collect(),
        }
    }

    pub fn from_stems<I, S>(stems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: stems.into_iter().map(CatalogEntry::from_stem).collect(),
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn entry_by_stem(&self, stem: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.stem == stem)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Turns a raw Blender export stem into the catalog naming convention.
///
/// `Retopo_futakuchi-onna.002` becomes `Futakuchi_Onna`.
pub fn canonical_export_stem(stem: &str) -> String {
    let name = stem.strip_prefix("Retopo_").unwrap_or(stem);
    let name = strip_counter_suffix(name);
    let name = name.replace("_RemeshSrc", "").replace('-', " ");

    name.split_whitespace()
        .map(title_word)
        .collect::<Vec<_>>()
        .join("_")
}

fn strip_counter_suffix(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((head, counter))
            if counter.len() == 3 && counter.bytes().all(|b| b.is_ascii_digit()) =>
        {
            head
        }
        _ => name,
    }
}

// Capitalizes after every non-letter, so "o'brien_x" reads "O'Brien_X".
fn title_word(word: &str) -> String {
    let mut titled = String::with_capacity(word.len());
    let mut boundary = true;
    for c in word.chars() {
        if c.is_alphabetic() {
            if boundary {
                titled.extend(c.to_uppercase());
            } else {
                titled.extend(c.to_lowercase());
            }
            boundary = false;
        } else {
            titled.push(c);
            boundary = true;
        }
    }
    titled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_lose_only_the_final_extension() {
        let catalog = Catalog::from_file_names(["Kappa.glb", "Okomeki.001.glb", "README"]);
        let stems: Vec<&str> = catalog
            .entries()
            .iter()
            .map(|entry| entry.stem.as_str())
            .collect();
        assert_eq!(stems, vec!["Kappa", "Okomeki.001", "README"]);
        assert_eq!(catalog.entries()[1].file_name, "Okomeki.001.glb");
    }

    #[test]
    fn entry_by_stem_returns_first_occurrence() {
        let catalog = Catalog::from_file_names(["Baku.glb", "Baku.webp"]);
        let entry = catalog.entry_by_stem("Baku").expect("entry present");
        assert_eq!(entry.file_name, "Baku.glb");
        assert!(catalog.entry_by_stem("Basan").is_none());
    }

    #[test]
    fn canonical_export_stem_cleans_export_names() {
        assert_eq!(
            canonical_export_stem("Retopo_futakuchi-onna.002"),
            "Futakuchi_Onna"
        );
        assert_eq!(
            canonical_export_stem("Retopo_yuki-onna_RemeshSrc.001"),
            "Yuki_Onna"
        );
        assert_eq!(canonical_export_stem("Retopo_kappa"), "Kappa");
        assert_eq!(canonical_export_stem("abe  no -seimei"), "Abe_No_Seimei");
        assert_eq!(canonical_export_stem("Okomeki.01"), "Okomeki.01");
        assert_eq!(canonical_export_stem(""), "");
    }
}
