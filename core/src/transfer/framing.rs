//! Length-prefixed framing for the data stream
//!
//! Every payload crossing the data connection - the metadata JSON and each
//! ciphertext chunk - is prefixed with a 4-byte little-endian length. A
//! zero length is reserved for the end-of-stream terminator. AES-GCM
//! ciphertexts can contain any byte sequence, so a length prefix is the
//! only safe framing.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::protocol::constants::MAX_FRAME_SIZE;
use crate::{Error, Result};

/// Write one length-prefixed frame.
pub async fn write_frame<W: AsyncWrite + Unpin>(writer: &mut W, payload: &[u8]) -> Result<()> {
    if payload.is_empty() || payload.len() > MAX_FRAME_SIZE {
        return Err(Error::Protocol(format!(
            "refusing to write frame of {} bytes (max {})",
            payload.len(),
            MAX_FRAME_SIZE
        )));
    }

    writer
        .write_all(&(payload.len() as u32).to_le_bytes())
        .await
        .map_err(|e| Error::Network(e.to_string()))?;
    writer
        .write_all(payload)
        .await
        .map_err(|e| Error::Network(e.to_string()))?;
    writer
        .flush()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    Ok(())
}

/// Write the zero-length end-of-stream terminator.
pub async fn write_terminator<W: AsyncWrite + Unpin>(writer: &mut W) -> Result<()> {
    writer
        .write_all(&0u32.to_le_bytes())
        .await
        .map_err(|e| Error::Network(e.to_string()))?;
    writer
        .flush()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    Ok(())
}

/// Read one frame. Returns `None` for the terminator.
///
/// A short read anywhere is fatal; frames above [`MAX_FRAME_SIZE`] are
/// rejected before any allocation.
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Option<Vec<u8>>> {
    let mut len_buf = [0u8; 4];
    reader
        .read_exact(&mut len_buf)
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    let len = u32::from_le_bytes(len_buf) as usize;
    if len == 0 {
        return Ok(None);
    }
    if len > MAX_FRAME_SIZE {
        return Err(Error::Protocol(format!(
            "frame too large: {} bytes (max {})",
            len, MAX_FRAME_SIZE
        )));
    }

    let mut payload = vec![0u8; len];
    reader
        .read_exact(&mut payload)
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    Ok(Some(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_frame_roundtrip() {
        let payload = b"ciphertext bytes";

        let mut buffer = Vec::new();
        write_frame(&mut buffer, payload).await.unwrap();
        assert_eq!(&buffer[..4], &(payload.len() as u32).to_le_bytes());

        let mut cursor = Cursor::new(buffer);
        let frame = read_frame(&mut cursor).await.unwrap();
        assert_eq!(frame.as_deref(), Some(payload.as_slice()));
    }

    #[tokio::test]
    async fn test_terminator_reads_as_none() {
        let mut buffer = Vec::new();
        write_terminator(&mut buffer).await.unwrap();
        assert_eq!(buffer, 0u32.to_le_bytes());

        let mut cursor = Cursor::new(buffer);
        assert!(read_frame(&mut cursor).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_oversized_frame_rejected() {
        let mut buffer = Vec::new();
        let result = write_frame(&mut buffer, &vec![0u8; MAX_FRAME_SIZE + 1]).await;
        assert!(matches!(result, Err(Error::Protocol(_))));

        // A hostile length prefix is rejected without allocating.
        let mut wire = Vec::new();
        wire.extend_from_slice(&(u32::MAX).to_le_bytes());
        let mut cursor = Cursor::new(wire);
        assert!(matches!(
            read_frame(&mut cursor).await,
            Err(Error::Protocol(_))
        ));
    }

    #[tokio::test]
    async fn test_truncated_frame_is_fatal() {
        let mut wire = Vec::new();
        wire.extend_from_slice(&8u32.to_le_bytes());
        wire.extend_from_slice(b"shor");

        let mut cursor = Cursor::new(wire);
        assert!(matches!(
            read_frame(&mut cursor).await,
            Err(Error::Network(_))
        ));
    }
}
