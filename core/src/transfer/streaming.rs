//! Chunked AEAD streaming over an established connection

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::crypto::SessionKey;
use crate::protocol::constants::CHUNK_SIZE;
use crate::transfer::framing;
use crate::transfer::TransferProgress;
use crate::{Error, Result};

/// Read plaintext from `reader` in chunks of up to [`CHUNK_SIZE`] bytes,
/// seal each under its sequential index, and frame the ciphertext onto
/// `writer`, finishing with the zero-length terminator.
pub async fn encode_stream<R, W>(
    reader: &mut R,
    writer: &mut W,
    key: &SessionKey,
    progress: &dyn TransferProgress,
) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut chunk_index: u64 = 0;

    loop {
        let bytes_read = reader.read(&mut buffer).await?;
        if bytes_read == 0 {
            break;
        }

        let sealed = key.seal_chunk(chunk_index, &buffer[..bytes_read])?;
        framing::write_frame(writer, &sealed).await?;

        chunk_index = chunk_index
            .checked_add(1)
            .ok_or_else(|| Error::Protocol("chunk counter overflow".to_string()))?;
        progress.advance(bytes_read as u64);
    }

    tracing::debug!("sent {} chunks", chunk_index);
    framing::write_terminator(writer).await
}

/// Read framed ciphertext from `reader`, open each chunk under the
/// mirrored index, and deliver plaintext to `writer` in order until the
/// terminator.
///
/// Any authentication failure aborts immediately; no bytes from a failed
/// chunk ever reach `writer`. Reordered or replayed frames fail the same
/// way because the sender's nonces are strictly sequential.
pub async fn decode_stream<R, W>(
    reader: &mut R,
    writer: &mut W,
    key: &SessionKey,
    progress: &dyn TransferProgress,
) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut chunk_index: u64 = 0;

    while let Some(ciphertext) = framing::read_frame(reader).await? {
        let plaintext = key.open_chunk(chunk_index, &ciphertext)?;
        writer.write_all(&plaintext).await?;

        chunk_index = chunk_index
            .checked_add(1)
            .ok_or_else(|| Error::Protocol("chunk counter overflow".to_string()))?;
        progress.advance(plaintext.len() as u64);
    }

    tracing::debug!("received {} chunks", chunk_index);
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::constants::{KEY_SIZE, TAG_SIZE};
    use crate::transfer::NullProgress;
    use std::io::Cursor;

    fn key() -> SessionKey {
        SessionKey::from_bytes([0x42; KEY_SIZE])
    }

    async fn encode_to_vec(input: &[u8], key: &SessionKey) -> Vec<u8> {
        let mut reader = Cursor::new(input.to_vec());
        let mut wire = Vec::new();
        encode_stream(&mut reader, &mut wire, key, &NullProgress)
            .await
            .unwrap();
        wire
    }

    #[tokio::test]
    async fn test_roundtrip_multiple_chunks() {
        let input: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let wire = encode_to_vec(&input, &key()).await;

        let mut output = Vec::new();
        decode_stream(&mut Cursor::new(wire), &mut output, &key(), &NullProgress)
            .await
            .unwrap();
        assert_eq!(output, input);
    }

    #[tokio::test]
    async fn test_empty_input_writes_only_terminator() {
        let wire = encode_to_vec(&[], &key()).await;
        assert_eq!(wire, 0u32.to_le_bytes());

        let mut output = Vec::new();
        decode_stream(&mut Cursor::new(wire), &mut output, &key(), &NullProgress)
            .await
            .unwrap();
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn test_exact_chunk_boundary_is_one_frame() {
        let input = vec![0xAB; CHUNK_SIZE];
        let wire = encode_to_vec(&input, &key()).await;

        // One frame of CHUNK_SIZE + TAG_SIZE ciphertext, then the terminator.
        assert_eq!(wire.len(), 4 + CHUNK_SIZE + TAG_SIZE + 4);
        assert_eq!(&wire[..4], &((CHUNK_SIZE + TAG_SIZE) as u32).to_le_bytes());
        assert_eq!(&wire[wire.len() - 4..], &0u32.to_le_bytes());
    }

    #[tokio::test]
    async fn test_wrong_key_fails_before_any_output() {
        let wire = encode_to_vec(b"secret payload", &key()).await;

        let other = SessionKey::from_bytes([0x43; KEY_SIZE]);
        let mut output = Vec::new();
        let result =
            decode_stream(&mut Cursor::new(wire), &mut output, &other, &NullProgress).await;

        assert!(matches!(result, Err(Error::Crypto(_))));
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn test_reordered_frames_fail_authentication() {
        let input = vec![0x11; CHUNK_SIZE * 2];
        let wire = encode_to_vec(&input, &key()).await;

        // Swap the two ciphertext frames on the wire.
        let frame_len = 4 + CHUNK_SIZE + TAG_SIZE;
        let mut swapped = Vec::new();
        swapped.extend_from_slice(&wire[frame_len..frame_len * 2]);
        swapped.extend_from_slice(&wire[..frame_len]);
        swapped.extend_from_slice(&wire[frame_len * 2..]);

        let mut output = Vec::new();
        let result =
            decode_stream(&mut Cursor::new(swapped), &mut output, &key(), &NullProgress).await;
        assert!(matches!(result, Err(Error::Crypto(_))));
    }

    #[tokio::test]
    async fn test_truncated_stream_is_fatal() {
        let wire = encode_to_vec(&[0x22; 100], &key()).await;
        // Drop the terminator and the tail of the frame.
        let truncated = wire[..wire.len() - 10].to_vec();

        let mut output = Vec::new();
        let result =
            decode_stream(&mut Cursor::new(truncated), &mut output, &key(), &NullProgress).await;
        assert!(result.is_err());
    }
}
