use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupporterError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("embedding model error: {0}")]
    Model(String),
}

pub type Result<T> = std::result::Result<T, SupporterError>;
