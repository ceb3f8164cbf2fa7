//! Chunked symmetric encryption using AES-256-GCM

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use zeroize::Zeroize;

use crate::protocol::constants::{KEY_SIZE, NONCE_SIZE};
use crate::{Error, Result};

/// AES-256-GCM session key derived from the ECDH shared secret.
///
/// Chunks are sealed with a nonce built from their sequential index, so a
/// key must never outlive its session: the construction is only safe while
/// the key itself is single-use. The raw bytes are kept alongside the
/// cipher because the SAS is computed over them; they are wiped on drop.
pub struct SessionKey {
    key: [u8; KEY_SIZE],
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKey").finish_non_exhaustive()
    }
}

impl Drop for SessionKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl SessionKey {
    /// Create a session key from raw bytes
    pub fn from_bytes(key: [u8; KEY_SIZE]) -> Self {
        let cipher = Aes256Gcm::new_from_slice(&key).expect("32 bytes is a valid AES-256 key");
        Self { key, cipher }
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }

    /// Encrypt one chunk, authenticated under its index.
    ///
    /// The returned ciphertext carries the 16-byte GCM tag.
    pub fn seal_chunk(&self, chunk_index: u64, plaintext: &[u8]) -> Result<Vec<u8>> {
        let nonce = nonce_for(chunk_index);
        self.cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| Error::Crypto(format!("failed to encrypt chunk #{}", chunk_index)))
    }

    /// Decrypt and authenticate one chunk.
    ///
    /// Fails if the ciphertext was tampered with, reordered, or sealed
    /// under a different key (typically a passphrase mismatch).
    pub fn open_chunk(&self, chunk_index: u64, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let nonce = nonce_for(chunk_index);
        self.cipher
            .decrypt(Nonce::from_slice(&nonce), ciphertext)
            .map_err(|_| {
                Error::Crypto(format!(
                    "failed to decrypt chunk #{} (check passphrase)",
                    chunk_index
                ))
            })
    }
}

/// Embed the chunk index little-endian in the low 8 bytes of the nonce.
/// The high 4 bytes stay zero, so indices can never collide.
fn nonce_for(chunk_index: u64) -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    nonce[..8].copy_from_slice(&chunk_index.to_le_bytes());
    nonce
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::constants::TAG_SIZE;

    #[test]
    fn test_seal_open_roundtrip() {
        let key = SessionKey::from_bytes([7u8; KEY_SIZE]);
        let plaintext = b"attack at dawn";

        let sealed = key.seal_chunk(0, plaintext).unwrap();
        assert_eq!(sealed.len(), plaintext.len() + TAG_SIZE);

        let opened = key.open_chunk(0, &sealed).unwrap();
        assert_eq!(opened, plaintext);
    }

    #[test]
    fn test_wrong_index_fails() {
        let key = SessionKey::from_bytes([7u8; KEY_SIZE]);
        let sealed = key.seal_chunk(3, b"payload").unwrap();

        assert!(key.open_chunk(4, &sealed).is_err());
        assert!(key.open_chunk(3, &sealed).is_ok());
    }

    #[test]
    fn test_wrong_key_fails() {
        let key = SessionKey::from_bytes([7u8; KEY_SIZE]);
        let other = SessionKey::from_bytes([8u8; KEY_SIZE]);

        let sealed = key.seal_chunk(0, b"payload").unwrap();
        assert!(other.open_chunk(0, &sealed).is_err());
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = SessionKey::from_bytes([7u8; KEY_SIZE]);
        let mut sealed = key.seal_chunk(0, b"payload").unwrap();
        sealed[0] ^= 0x01;

        assert!(key.open_chunk(0, &sealed).is_err());
    }

    #[test]
    fn test_nonce_uniqueness() {
        let a = nonce_for(0);
        let b = nonce_for(1);
        let c = nonce_for(u64::MAX);
        assert_ne!(a, b);
        assert_ne!(b, c);
        // High bytes are never written.
        assert_eq!(&c[8..], &[0u8; 4]);
    }
}
