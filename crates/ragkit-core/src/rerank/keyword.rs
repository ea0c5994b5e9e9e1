//! Keyword extraction for the weighted rerank scorer.

/// Common English words carrying no ranking signal.
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// Extracts keywords from text.
///
/// Lowercase alphanumeric tokenisation; single-character tokens and
/// stopwords are dropped. Repeated keywords are kept, the weighted scorer
/// uses their counts as term frequencies.
#[must_use]
pub fn extract_keywords(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() > 1 && !STOPWORDS.contains(token))
        .map(String::from)
        .collect()
}
