//! Session orchestration: sender and receiver state machines
//!
//! The orchestrators compose discovery, rendezvous, key agreement, and the
//! AEAD chunk stream into one end-to-end protocol. Terminal concerns stay
//! outside the core: the SAS ceremony and progress rendering are injected
//! through the traits below.

pub mod framing;
pub mod streaming;

mod receiver;
mod sender;

pub use receiver::Receiver;
pub use sender::{ReadySender, Sender};

use crate::Result;

/// The human side of the SAS ceremony.
///
/// Implementations display the string and report whether the operator
/// confirmed it matches the peer's. Returning `Ok(false)` aborts the
/// session.
pub trait SasConfirm: Send + Sync {
    fn confirm(&self, sas: &str) -> Result<bool>;
}

/// Byte-level progress reporting for a transfer.
pub trait TransferProgress: Send + Sync {
    fn begin(&self, _name: &str, _total_bytes: u64) {}
    fn advance(&self, _bytes: u64) {}
    fn finish(&self) {}
}

/// Progress sink that reports nothing.
pub struct NullProgress;

impl TransferProgress for NullProgress {}
