//! Sender state machine

use std::path::PathBuf;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

use crate::code;
use crate::crypto::{derive_session_key, generate_sas, EphemeralSecret};
use crate::discovery::{self, DiscoveryPublisher};
use crate::protocol::constants::{CODE_WORD_COUNT, RENDEZVOUS_PORT, SAS_WORD_COUNT};
use crate::protocol::FileMetadata;
use crate::rendezvous::{RendezvousHandle, RendezvousServer};
use crate::transfer::{framing, streaming, SasConfirm, TransferProgress};
use crate::{Error, Result};

/// A sender session before any network resources are claimed.
pub struct Sender {
    file_path: PathBuf,
    passphrase: String,
}

impl Sender {
    /// Validate the input file and prepare a session.
    pub fn new(file_path: impl Into<PathBuf>, passphrase: String) -> Result<Self> {
        let file_path = file_path.into();

        let meta = std::fs::metadata(&file_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::InvalidInput(format!("file not found: {}", file_path.display()))
            } else {
                Error::InvalidInput(format!(
                    "could not access {}: {}",
                    file_path.display(),
                    e
                ))
            }
        })?;

        if meta.is_dir() {
            return Err(Error::InvalidInput(format!(
                "path is a directory, not a file: {}",
                file_path.display()
            )));
        }

        Ok(Self {
            file_path,
            passphrase,
        })
    }

    /// Claim the session's network resources and surface the transfer code.
    ///
    /// The data listener, rendezvous registration, and mDNS advertisement
    /// are all live before this returns, so a receiver started the moment
    /// the code is shown cannot observe a stale or missing mapping.
    pub async fn start(self) -> Result<ReadySender> {
        let code = code::generate(CODE_WORD_COUNT);
        let secret = EphemeralSecret::generate();

        let listener = TcpListener::bind(("0.0.0.0", 0))
            .await
            .map_err(|e| Error::Network(format!("could not start listener: {}", e)))?;
        let data_port = listener
            .local_addr()
            .map_err(|e| Error::Network(e.to_string()))?
            .port();

        let rendezvous = RendezvousServer::bind(RENDEZVOUS_PORT).await?;
        rendezvous.register(&code, data_port).await;
        let rendezvous = rendezvous.start();

        let publisher = match discovery::publish(&code, RENDEZVOUS_PORT) {
            Ok(publisher) => publisher,
            Err(e) => {
                rendezvous.abort();
                return Err(e);
            }
        };

        tracing::info!("sender ready: code={} data_port={}", code, data_port);

        Ok(ReadySender {
            code,
            secret,
            listener,
            rendezvous,
            publisher,
            file_path: self.file_path,
            passphrase: self.passphrase,
        })
    }
}

/// A sender session that is listening and advertised on the network.
pub struct ReadySender {
    code: String,
    secret: EphemeralSecret,
    listener: TcpListener,
    rendezvous: RendezvousHandle,
    publisher: DiscoveryPublisher,
    file_path: PathBuf,
    passphrase: String,
}

impl ReadySender {
    /// The transfer code the receiver needs.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Serve exactly one transfer, then tear everything down.
    ///
    /// The rendezvous server and mDNS advertisement are released on every
    /// exit path, including handshake failures and SAS rejection.
    pub async fn transfer(
        self,
        confirm: &dyn SasConfirm,
        progress: &dyn TransferProgress,
    ) -> Result<()> {
        let ReadySender {
            code: _,
            secret,
            listener,
            rendezvous,
            publisher,
            file_path,
            passphrase,
        } = self;

        let result = run_session(secret, listener, &file_path, &passphrase, confirm, progress).await;

        rendezvous.abort();
        publisher.shutdown();
        result
    }
}

async fn run_session(
    secret: EphemeralSecret,
    listener: TcpListener,
    file_path: &std::path::Path,
    passphrase: &str,
    confirm: &dyn SasConfirm,
    progress: &dyn TransferProgress,
) -> Result<()> {
    let (mut stream, peer_addr) = listener
        .accept()
        .await
        .map_err(|e| Error::Network(format!("failed to accept connection: {}", e)))?;
    // One connection per session.
    drop(listener);
    tracing::info!("peer connected from {}", peer_addr);

    let shared = secret.exchange(&mut stream).await?;
    let key = derive_session_key(&shared, passphrase);

    let sas = generate_sas(&key, SAS_WORD_COUNT);
    if !confirm.confirm(&sas)? {
        let _ = stream.shutdown().await;
        return Err(Error::SasRejected);
    }

    let meta = FileMetadata::for_path(file_path).await?;
    framing::write_frame(&mut stream, &serde_json::to_vec(&meta)?).await?;
    tracing::debug!("sent metadata: {:?}", meta);

    progress.begin(&meta.name, meta.size);
    let mut file = tokio::fs::File::open(file_path).await?;
    streaming::encode_stream(&mut file, &mut stream, &key, progress).await?;
    progress.finish();

    stream
        .shutdown()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    tracing::info!("transfer complete");
    Ok(())
}
