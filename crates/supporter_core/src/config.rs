use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SupporterError};

pub const DEFAULT_KEYWORD_THRESHOLD: usize = 1;
pub const DEFAULT_TOKEN_THRESHOLD: usize = 1;
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.55;

/// The three tunables of the matching pipeline. Values come from a config
/// file or CLI flags, never from call sites.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Whole keyword phrases that must appear in the query before an entry
    /// can pass the gate.
    #[serde(default = "default_keyword_threshold")]
    pub keyword_threshold: usize,

    /// Individual keyword tokens that must appear in the query before an
    /// entry can pass the gate.
    #[serde(default = "default_token_threshold")]
    pub token_threshold: usize,

    /// Minimum similarity the best candidate must reach to be accepted.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,
}

fn default_keyword_threshold() -> usize {
    DEFAULT_KEYWORD_THRESHOLD
}

fn default_token_threshold() -> usize {
    DEFAULT_TOKEN_THRESHOLD
}

fn default_similarity_threshold() -> f32 {
    DEFAULT_SIMILARITY_THRESHOLD
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            keyword_threshold: DEFAULT_KEYWORD_THRESHOLD,
            token_threshold: DEFAULT_TOKEN_THRESHOLD,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl MatcherConfig {
    /// Reads a JSON config file; absent keys fall back to the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let config: MatcherConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.similarity_threshold.is_finite() {
            return Err(SupporterError::Config(
                "similarity-threshold must be a finite number".to_string(),
            ));
        }
        if self.similarity_threshold > 1.0 {
            return Err(SupporterError::Config(format!(
                "similarity-threshold {} can never be reached (cosine similarity is at most 1.0)",
                self.similarity_threshold
            )));
        }
        Ok(())
    }
}
