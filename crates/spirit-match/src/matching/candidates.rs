use super::normalizer::normalize;

const HONORIFIC_SUFFIX: &str = "NoMikoto";
const HONORIFIC_SUFFIX_SNAKE: &str = "_No_Mikoto";

/// Normalized romanized variants of one display name.
///
/// Keys are deduplicated and kept in generation order; the first key is always
/// the normalized latin segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    keys: Vec<String>,
}

impl CandidateSet {
    pub fn generate(display_name: &str) -> Self {
        let latin = latin_segment(display_name);
        let mut set = Self { keys: Vec::new() };

        if latin.is_empty() {
            set.insert(String::new());
            return set;
        }

        let variants = [
            latin.to_string(),
            latin.replace('-', "_"),
            latin.replace('-', ""),
            latin.replace('_', ""),
            title_case(latin),
            latin.to_uppercase(),
        ];
        for variant in variants {
            set.insert(normalize(&variant));
        }

        if !latin.ends_with(HONORIFIC_SUFFIX) {
            set.insert(normalize(&format!("{latin}{HONORIFIC_SUFFIX}")));
            set.insert(normalize(&format!("{latin}{HONORIFIC_SUFFIX_SNAKE}")));
        }

        set
    }

    /// Key derived from the bare latin segment.
    pub fn primary(&self) -> &str {
        self.keys.first().map(String::as_str).unwrap_or_default()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|existing| existing == key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn insert(&mut self, key: String) {
        if !self.contains(&key) {
            self.keys.push(key);
        }
    }
}

/// Leading token of a display name, cut at the first whitespace, `(` or `（`.
pub fn latin_segment(display_name: &str) -> &str {
    let end = display_name
        .find(|c: char| c.is_whitespace() || c == '(' || c == '（')
        .unwrap_or(display_name.len());
    &display_name[..end]
}

fn title_case(value: &str) -> String {
    let mut titled = String::with_capacity(value.len());
    let mut word_start = true;
    for c in value.chars() {
        if c.is_whitespace() || c == '_' {
            word_start = true;
            titled.push(c);
        } else if word_start {
            titled.extend(c.to_uppercase());
            word_start = false;
        } else {
            titled.extend(c.to_lowercase());
        }
    }
    titled
}
