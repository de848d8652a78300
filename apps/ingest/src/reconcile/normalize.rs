use unicode_normalization::UnicodeNormalization;

/// Builds a comparison key: compatibility-decomposed (NFKD), trimmed, lower-cased.
///
/// Only used for dedup and matching keys. Stored and displayed text is never
/// replaced by its normalized form.
pub fn normalize(text: &str) -> String {
    text.nfkd().collect::<String>().trim().to_lowercase()
}
