use thiserror::Error;

/// LanCrypt error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Discovery error: {0}")]
    Discovery(String),

    #[error("Rendezvous error: {0}")]
    Rendezvous(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Cryptographic operation failed: {0}")]
    Crypto(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Transfer rejected: authentication strings did not match")]
    SasRejected,

    #[error("Failed to serialize/deserialize: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
