use std::path::Path;

use crate::config::MatcherConfig;
use crate::embed::EmbeddingProvider;
use crate::error::Result;
use crate::gate;
use crate::model::{Decision, FaqEntry, MatchOutcome};
use crate::normalize::normalize;
use crate::scorer::score_entry;
use crate::storage;

/// Shared read-only matching session. Corpus, embedder and thresholds are
/// assembled once and never mutated afterwards, so one `Matcher` can serve
/// any number of concurrent callers through `&self`.
pub struct Matcher<E> {
    entries: Vec<FaqEntry>,
    embedder: E,
    config: MatcherConfig,
}

impl<E: EmbeddingProvider> Matcher<E> {
    pub fn new(entries: Vec<FaqEntry>, embedder: E, config: MatcherConfig) -> Self {
        Self {
            entries,
            embedder,
            config,
        }
    }

    /// Loads the corpus at `path`, degrading to an empty corpus (and thus a
    /// not-found answer for every query) when the file is missing or
    /// malformed.
    pub fn open(path: &Path, embedder: E, config: MatcherConfig) -> Self {
        Self::new(storage::load_entries_or_empty(path), embedder, config)
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Gate, then score, then decide.
    ///
    /// An empty candidate set returns not-found without touching the
    /// embedder. The arg-max uses a strict comparison, so equal scores keep
    /// the earliest candidate.
    pub fn answer(&self, question: &str) -> Result<MatchOutcome> {
        let query = normalize(question);
        let candidates = gate::candidates(&query, &self.entries, &self.config);
        if candidates.is_empty() {
            tracing::debug!(query = %query, "no entries passed the keyword gate");
            return Ok(MatchOutcome::not_found());
        }

        let query_embedding = self.embedder.embed(&query)?;

        let mut best: Option<(&FaqEntry, f32)> = None;
        for entry in candidates {
            let score = score_entry(&self.embedder, &query_embedding, entry)?;
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((entry, score)),
            }
        }

        match best {
            Some((entry, score)) if score >= self.config.similarity_threshold => Ok(MatchOutcome {
                entry_id: Some(entry.id),
                answer: Some(entry.answer.clone()),
                score,
                decision: Decision::Hit,
            }),
            Some((entry, score)) => {
                tracing::debug!(
                    entry_id = entry.id,
                    score,
                    threshold = self.config.similarity_threshold,
                    "best candidate below similarity threshold"
                );
                Ok(MatchOutcome {
                    entry_id: Some(entry.id),
                    answer: None,
                    score,
                    decision: Decision::Miss,
                })
            }
            None => Ok(MatchOutcome::not_found()),
        }
    }
}
