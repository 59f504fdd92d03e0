use crate::config::MatcherConfig;
use crate::model::FaqEntry;
use crate::normalize::normalize;

/// Two-counter keyword scan with an early return.
///
/// `phrase_hits` counts whole keyword phrases found verbatim (modulo
/// stopwords) inside the normalized query; `token_hits` counts individual
/// keyword tokens found as substrings. The entry passes the instant both
/// counters reach their thresholds and the remaining keywords are never
/// inspected. Entries without keywords can never pass.
pub fn passes_gate(normalized_query: &str, keywords: &[String], config: &MatcherConfig) -> bool {
    let mut phrase_hits = 0usize;
    let mut token_hits = 0usize;

    for keyword in keywords {
        let keyword = keyword.to_lowercase();
        if normalized_query.contains(&normalize(&keyword)) {
            phrase_hits += 1;
        }
        for token in keyword.split_whitespace() {
            if normalized_query.contains(token) {
                token_hits += 1;
            }
            if phrase_hits >= config.keyword_threshold && token_hits >= config.token_threshold {
                return true;
            }
        }
    }

    false
}

/// Filters the corpus down to gate-passing candidates, preserving corpus
/// order. This is the cheap step that keeps the scorer from touching every
/// entry.
pub fn candidates<'a>(
    normalized_query: &str,
    entries: &'a [FaqEntry],
    config: &MatcherConfig,
) -> Vec<&'a FaqEntry> {
    entries
        .iter()
        .filter(|entry| passes_gate(normalized_query, &entry.keywords, config))
        .collect()
}
