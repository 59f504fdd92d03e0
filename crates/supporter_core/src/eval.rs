use std::collections::HashSet;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::embed::EmbeddingProvider;
use crate::error::Result;
use crate::model::{Decision, FaqEntry, QuestionField};
use crate::ranker::Matcher;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalOutcome {
    pub entry_id: u64,
    pub passed: bool,
    pub decision: Decision,
    pub matched_id: Option<u64>,
    pub score: f32,
    pub latency_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    pub run_id: String,
    pub field: QuestionField,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed_ids: Vec<u64>,
    pub accuracy: f32,
    pub outcomes: Vec<EvalOutcome>,
}

/// Replays every entry's own question text through the matcher and checks
/// that the corpus answers with that same entry. Failing ids point at
/// entries whose keywords or paraphrases need manual curation.
///
/// Runs sequentially: the running accuracy and per-case timing depend on a
/// deterministic, non-interleaved processing order.
pub fn self_consistency<E>(matcher: &Matcher<E>, field: QuestionField) -> Result<EvalReport>
where
    E: EmbeddingProvider,
{
    let started_at = Utc::now();
    let run_id = format!("eval-{}", started_at.timestamp_millis());
    let total = matcher.entries().len();

    let mut outcomes = Vec::with_capacity(total);
    let mut failed_ids = Vec::new();

    for (i, entry) in matcher.entries().iter().enumerate() {
        let question = field.text(entry);
        let start = Instant::now();
        let outcome = matcher.answer(question)?;
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        let passed = outcome.decision == Decision::Hit && outcome.entry_id == Some(entry.id);
        if !passed {
            failed_ids.push(entry.id);
        }
        outcomes.push(EvalOutcome {
            entry_id: entry.id,
            passed,
            decision: outcome.decision,
            matched_id: outcome.entry_id,
            score: outcome.score,
            latency_ms,
        });

        let done = i + 1;
        if done % 10 == 0 || done == total {
            let accuracy = 100.0 * (done - failed_ids.len()) as f32 / done as f32;
            let recent: Vec<u64> = failed_ids.iter().rev().take(10).rev().copied().collect();
            tracing::info!(
                processed = done,
                total,
                accuracy,
                recent_failures = ?recent,
                "self-consistency progress"
            );
        }
    }

    let passed = total - failed_ids.len();
    let accuracy = if total == 0 {
        0.0
    } else {
        passed as f32 / total as f32
    };

    Ok(EvalReport {
        run_id,
        field,
        started_at,
        completed_at: Utc::now(),
        total,
        passed,
        failed_ids,
        accuracy,
        outcomes,
    })
}

/// Keeps the first entry for each distinct value of `field`, preserving the
/// original order of the survivors.
pub fn dedup_entries(entries: Vec<FaqEntry>, field: QuestionField) -> Vec<FaqEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(field.text(entry).to_string()))
        .collect()
}

/// The subset of `entries` whose id appears in `failed_ids`, in corpus
/// order, for manual curation of keywords and paraphrases.
pub fn export_failed(entries: &[FaqEntry], failed_ids: &[u64]) -> Vec<FaqEntry> {
    let wanted: HashSet<u64> = failed_ids.iter().copied().collect();
    entries
        .iter()
        .filter(|entry| wanted.contains(&entry.id))
        .cloned()
        .collect()
}
