//! Centralized protocol constants
//!
//! All protocol-level constants are defined here to ensure consistency
//! across the codebase and make configuration easier.

use std::time::Duration;

/// mDNS service type for discovery
pub const SERVICE_TYPE: &str = "_lancrypt._tcp.local.";

/// Fixed TCP port for the rendezvous HTTP server
pub const RENDEZVOUS_PORT: u16 = 13337;

/// Informational TXT records attached to the mDNS advertisement
pub const TXT_RECORDS: &[(&str, &str)] = &[("txtv", "0"), ("lo", "1"), ("la", "2")];

/// How long the receiver browses for the sender before giving up
pub const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Plaintext bytes read per chunk on the sending side
pub const CHUNK_SIZE: usize = 4096;

/// AES-256-GCM authentication tag length
pub const TAG_SIZE: usize = 16;

/// Symmetric key and X25519 point length
pub const KEY_SIZE: usize = 32;

/// AES-GCM nonce length
pub const NONCE_SIZE: usize = 12;

/// Maximum ciphertext frame length accepted on the wire.
///
/// A well-behaved sender never produces more than CHUNK_SIZE + TAG_SIZE
/// bytes per frame; the cap bounds allocations against hostile peers.
pub const MAX_FRAME_SIZE: usize = 64 * 1024;

/// Words in a transfer code
pub const CODE_WORD_COUNT: usize = 3;

/// Words in a short authentication string
pub const SAS_WORD_COUNT: usize = 3;
