use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("unsupported digest algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("digest algorithm {0} is not compiled in")]
    AlgorithmDisabled(&'static str),

    #[error("invalid {algorithm} digest: {value}")]
    InvalidDigest {
        algorithm: &'static str,
        value:     String,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, VerificationError>;
