pub mod config;
pub mod embed;
pub mod error;
pub mod eval;
pub mod gate;
pub mod model;
pub mod normalize;
pub mod ranker;
pub mod scorer;
pub mod storage;

pub use config::{
    MatcherConfig, DEFAULT_KEYWORD_THRESHOLD, DEFAULT_SIMILARITY_THRESHOLD,
    DEFAULT_TOKEN_THRESHOLD,
};
pub use embed::{
    cosine_similarity, EmbeddingProvider, HashEmbeddingProvider, WordVectorProvider,
    DEFAULT_EMBEDDING_DIM,
};
pub use error::{Result, SupporterError};
pub use eval::{dedup_entries, export_failed, self_consistency, EvalOutcome, EvalReport};
pub use gate::{candidates, passes_gate};
pub use model::{Decision, FaqEntry, MatchOutcome, QuestionField};
pub use normalize::normalize;
pub use ranker::Matcher;
pub use scorer::{question_variants, score_entry};
pub use storage::{load_entries, load_entries_or_empty, save_entries};
