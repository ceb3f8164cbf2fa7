//! Receiver state machine

use std::net::IpAddr;
use std::path::PathBuf;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::code;
use crate::crypto::{derive_session_key, generate_sas, EphemeralSecret};
use crate::discovery;
use crate::protocol::constants::{DISCOVERY_TIMEOUT, SAS_WORD_COUNT};
use crate::protocol::FileMetadata;
use crate::rendezvous;
use crate::transfer::{framing, streaming, SasConfirm, TransferProgress};
use crate::{Error, Result};

/// A receiver session keyed by the sender's transfer code.
pub struct Receiver {
    code: String,
    passphrase: String,
}

impl Receiver {
    /// Validate the code shape and prepare a session.
    pub fn new(code: String, passphrase: String) -> Result<Self> {
        code::validate(&code)?;
        Ok(Self { code, passphrase })
    }

    /// Run the whole session: discover, resolve, dial, handshake, verify,
    /// and stream into a file in the current working directory.
    ///
    /// Returns the path of the written file. An existing file with the
    /// same name is overwritten. If decryption fails mid-stream the file
    /// is left behind truncated at the last authenticated chunk; no
    /// unauthenticated bytes are ever written.
    pub async fn receive(
        self,
        confirm: &dyn SasConfirm,
        progress: &dyn TransferProgress,
    ) -> Result<PathBuf> {
        let secret = EphemeralSecret::generate();

        tracing::info!("searching for sender '{}'", self.code);
        let (host, rendezvous_port) = discovery::discover(&self.code, DISCOVERY_TIMEOUT).await?;
        tracing::info!("found sender at {}", host);

        let data_port = rendezvous::lookup(IpAddr::V4(host), rendezvous_port, &self.code).await?;
        tracing::debug!("code resolved to data port {}", data_port);

        let mut stream = TcpStream::connect((host, data_port))
            .await
            .map_err(|e| Error::Network(format!("could not connect to sender: {}", e)))?;

        let shared = secret.exchange(&mut stream).await?;
        let key = derive_session_key(&shared, &self.passphrase);

        let sas = generate_sas(&key, SAS_WORD_COUNT);
        if !confirm.confirm(&sas)? {
            let _ = stream.shutdown().await;
            return Err(Error::SasRejected);
        }

        let meta_bytes = framing::read_frame(&mut stream)
            .await?
            .ok_or_else(|| Error::Protocol("missing file metadata".to_string()))?;
        let meta: FileMetadata = serde_json::from_slice(&meta_bytes)?;
        meta.validate()?;
        tracing::debug!("received metadata: {:?}", meta);

        progress.begin(&meta.name, meta.size);
        let output_path = PathBuf::from(&meta.name);
        let mut file = tokio::fs::File::create(&output_path).await?;

        streaming::decode_stream(&mut stream, &mut file, &key, progress).await?;
        file.flush().await?;
        progress.finish();

        tracing::info!("transfer complete: {}", output_path.display());
        Ok(output_path)
    }
}
