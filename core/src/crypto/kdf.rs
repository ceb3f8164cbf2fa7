//! Session key derivation

use hkdf::Hkdf;
use sha2::Sha256;

use crate::crypto::{SessionKey, SharedSecret};
use crate::protocol::constants::KEY_SIZE;

/// Derive the symmetric session key from the ECDH shared secret and an
/// optional passphrase.
///
/// The passphrase acts as the HKDF salt, so both peers must supply the
/// same one (or none) to arrive at the same key; a mismatch makes every
/// subsequent chunk fail authentication rather than failing here.
pub fn derive_session_key(shared: &SharedSecret, passphrase: &str) -> SessionKey {
    let salt = if passphrase.is_empty() {
        None
    } else {
        Some(passphrase.as_bytes())
    };

    let hkdf = Hkdf::<Sha256>::new(salt, shared.as_bytes());
    let mut key = [0u8; KEY_SIZE];
    hkdf.expand(&[], &mut key)
        .expect("32 bytes is a valid length for HKDF-SHA256");

    SessionKey::from_bytes(key)
}
