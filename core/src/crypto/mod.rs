//! Cryptographic primitives for LanCrypt
//!
//! - X25519 for the ephemeral ECDH key exchange
//! - HKDF-SHA256 for passphrase-bound session key derivation
//! - AES-256-GCM for chunked authenticated encryption
//! - SHA-256 word selection for the short authentication string

mod encryption;
mod kdf;
mod keys;
mod sas;

pub use encryption::SessionKey;
pub use kdf::derive_session_key;
pub use keys::{EphemeralSecret, PublicKey, SharedSecret};
pub use sas::generate_sas;
