//! Ephemeral X25519 keys and the on-wire key exchange

use rand::rngs::OsRng;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use x25519_dalek::{EphemeralSecret as X25519Secret, PublicKey as X25519Public};

use crate::protocol::constants::KEY_SIZE;
use crate::{Error, Result};

pub use x25519_dalek::SharedSecret;

/// X25519 ephemeral secret, generated per session and consumed by the
/// exchange. Zeroized on drop by the underlying implementation.
pub struct EphemeralSecret {
    inner: X25519Secret,
}

impl EphemeralSecret {
    /// Generate a new ephemeral secret
    pub fn generate() -> Self {
        Self {
            inner: X25519Secret::random_from_rng(OsRng),
        }
    }

    /// Get the corresponding public key
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            inner: X25519Public::from(&self.inner),
        }
    }

    /// Run the key exchange over an established stream.
    ///
    /// Both peers write their 32-byte public point before reading the
    /// peer's; the symmetry keeps the handshake single-round-trip and free
    /// of deadlock without negotiating roles.
    pub async fn exchange<S>(self, stream: &mut S) -> Result<SharedSecret>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let local_public = self.public_key();
        stream
            .write_all(local_public.as_bytes())
            .await
            .map_err(|e| Error::Network(format!("failed to send public key: {}", e)))?;
        stream
            .flush()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let mut remote_bytes = [0u8; KEY_SIZE];
        stream
            .read_exact(&mut remote_bytes)
            .await
            .map_err(|e| Error::Network(format!("failed to receive public key: {}", e)))?;

        let remote_public = PublicKey::from_bytes(remote_bytes);
        let shared = self.inner.diffie_hellman(&remote_public.inner);
        if !shared.was_contributory() {
            return Err(Error::Crypto(
                "peer supplied a low-order public key".to_string(),
            ));
        }

        Ok(shared)
    }
}

/// X25519 public key
#[derive(Clone)]
pub struct PublicKey {
    inner: X25519Public,
}

impl PublicKey {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self {
            inner: X25519Public::from(bytes),
        }
    }

    /// Borrow as raw bytes
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        self.inner.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ecdh_agreement() {
        let alice = EphemeralSecret::generate();
        let alice_public = alice.public_key();

        let bob = EphemeralSecret::generate();
        let bob_public = bob.public_key();

        let alice_shared = alice.inner.diffie_hellman(&bob_public.inner);
        let bob_shared = bob.inner.diffie_hellman(&alice_public.inner);

        assert_eq!(alice_shared.as_bytes(), bob_shared.as_bytes());
    }

    #[tokio::test]
    async fn test_exchange_over_stream() {
        let (mut left, mut right) = tokio::io::duplex(64);

        let alice = EphemeralSecret::generate();
        let bob = EphemeralSecret::generate();

        let alice_task = tokio::spawn(async move { alice.exchange(&mut left).await });
        let bob_shared = bob.exchange(&mut right).await.unwrap();
        let alice_shared = alice_task.await.unwrap().unwrap();

        assert_eq!(alice_shared.as_bytes(), bob_shared.as_bytes());
    }

    #[tokio::test]
    async fn test_exchange_fails_on_short_read() {
        let (mut left, right) = tokio::io::duplex(64);
        // Peer hangs up without sending its point.
        drop(right);

        let alice = EphemeralSecret::generate();
        let result = alice.exchange(&mut left).await;
        assert!(matches!(result, Err(Error::Network(_))));
    }
}
