/// Canonical comparison key: lower-case ASCII alphanumerics with "ou" collapsed to "o".
///
/// Romanized names drift between long-vowel spellings ("Orouchi" vs "Orochi").
/// The collapse runs left to right over the stripped text and never leaves an
/// "ou" behind, so the key is stable under re-normalization. This differs from
/// a single global `replace("ou", "o")` only on runs like "ouu", which become
/// "o" here rather than "ou".
pub fn normalize(value: &str) -> String {
    let mut key = String::with_capacity(value.len());
    for c in value.to_lowercase().chars() {
        if !(c.is_ascii_lowercase() || c.is_ascii_digit()) {
            continue;
        }
        if c == 'u' && key.ends_with('o') {
            continue;
        }
        key.push(c);
    }
    key
}
