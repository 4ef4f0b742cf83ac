//! Error types for hashcheck-lookup.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("still throttled after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("batch of {len} files exceeds the bound of {max}")]
    BatchTooLarge { len: usize, max: usize },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid client configuration: {0}")]
    Client(String),

    #[error("digest worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, LookupError>;
