use crate::embed::{cosine_similarity, EmbeddingProvider};
use crate::error::Result;
use crate::model::FaqEntry;
use crate::normalize::normalize;

/// All paraphrase variants of an entry: canonical question first, then the
/// short form, then the alternatives for each. Empty fields are yielded
/// as-is; they embed to the zero vector and never win.
pub fn question_variants(entry: &FaqEntry) -> impl Iterator<Item = &str> {
    std::iter::once(entry.question.as_str())
        .chain(std::iter::once(entry.question_short.as_str()))
        .chain(entry.question_alternatives.iter().map(String::as_str))
        .chain(entry.question_short_alternatives.iter().map(String::as_str))
}

/// An entry scores as its best-aligned paraphrase: one variant matching the
/// user's phrasing is enough, the rest can be arbitrarily far off.
pub fn score_entry<E>(embedder: &E, query_embedding: &[f32], entry: &FaqEntry) -> Result<f32>
where
    E: EmbeddingProvider,
{
    let mut best: Option<f32> = None;
    for variant in question_variants(entry) {
        let embedding = embedder.embed(&normalize(variant))?;
        let similarity = cosine_similarity(query_embedding, &embedding);
        best = Some(match best {
            Some(current) => current.max(similarity),
            None => similarity,
        });
    }
    Ok(best.unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::HashEmbeddingProvider;

    fn entry_with_variants(canonical: &str, short: &str, alternatives: &[&str]) -> FaqEntry {
        FaqEntry {
            id: 1,
            question: canonical.to_string(),
            question_short: short.to_string(),
            question_alternatives: alternatives.iter().map(|s| s.to_string()).collect(),
            question_short_alternatives: Vec::new(),
            keywords: Vec::new(),
            answer: "answer".to_string(),
        }
    }

    #[test]
    fn variants_are_enumerated_in_order() {
        let entry = entry_with_variants("canonical", "short", &["alt one", "alt two"]);
        let variants: Vec<&str> = question_variants(&entry).collect();
        assert_eq!(variants, vec!["canonical", "short", "alt one", "alt two"]);
    }

    #[test]
    fn best_variant_wins() {
        let embedder = HashEmbeddingProvider::new(128);
        let query = embedder.embed(&normalize("how do I delete my account")).expect("embed");

        // canonical is unrelated, an alternative matches the query exactly
        let entry = entry_with_variants(
            "completely unrelated words here",
            "",
            &["how do I delete my account"],
        );
        let score = score_entry(&embedder, &query, &entry).expect("score");
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn empty_variants_score_zero() {
        let embedder = HashEmbeddingProvider::new(128);
        let query = embedder.embed("anything").expect("embed");
        let entry = entry_with_variants("", "", &[]);
        let score = score_entry(&embedder, &query, &entry).expect("score");
        assert_eq!(score, 0.0);
    }

    #[test]
    fn empty_query_scores_zero() {
        let embedder = HashEmbeddingProvider::new(128);
        let query = embedder.embed("").expect("embed");
        let entry = entry_with_variants("a real question", "", &[]);
        let score = score_entry(&embedder, &query, &entry).expect("score");
        assert_eq!(score, 0.0);
    }
}
