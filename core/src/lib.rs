//! LanCrypt core - ephemeral encrypted file transfer over the local network
//!
//! This library implements the session protocol behind the `lancrypt` CLI:
//! mDNS discovery keyed by a human-readable transfer code, a rendezvous
//! lookup that resolves the code to the sender's data port, an ephemeral
//! X25519 key agreement with optional passphrase-bound key derivation, a
//! short authentication string (SAS) ceremony, and a chunked AES-256-GCM
//! stream. Nothing is persisted; a session either completes or fails.

pub mod code;
pub mod crypto;
pub mod discovery;
pub mod protocol;
pub mod rendezvous;
pub mod transfer;

mod error;

pub use error::{Error, Result};

// Re-export key types for convenience
pub use crypto::SessionKey;
pub use protocol::FileMetadata;
pub use transfer::{NullProgress, Receiver, SasConfirm, Sender, TransferProgress};
