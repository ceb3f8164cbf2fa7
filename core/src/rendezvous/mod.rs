//! Rendezvous registry: code-to-port resolution over plaintext HTTP
//!
//! The sender runs a one-route HTTP server on a fixed port. `GET /{code}`
//! answers with the decimal data port for a registered code, 404 otherwise.
//! This reveals nothing but a port number; confidentiality and
//! authentication come from the key exchange and the SAS ceremony, and the
//! server must never grow endpoints that accept data.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

use crate::{Error, Result};

type PortMap = Arc<RwLock<HashMap<String, String>>>;

/// Rendezvous HTTP server, bound but not yet serving.
pub struct RendezvousServer {
    listener: TcpListener,
    ports: PortMap,
}

impl RendezvousServer {
    /// Bind the server on all interfaces.
    pub async fn bind(port: u16) -> Result<Self> {
        let addr: SocketAddr = ([0, 0, 0, 0], port).into();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Rendezvous(format!("failed to bind port {}: {}", port, e)))?;

        Ok(Self {
            listener,
            ports: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// The bound address (useful when binding to port 0).
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| Error::Rendezvous(e.to_string()))
    }

    /// Map a code to a data port. Called once, before `start`.
    pub async fn register(&self, code: &str, data_port: u16) {
        self.ports
            .write()
            .await
            .insert(code.to_string(), data_port.to_string());
    }

    /// Start serving lookups on a background task.
    pub fn start(self) -> RendezvousHandle {
        let app = Router::new()
            .route("/:code", get(handle_lookup))
            .with_state(self.ports);

        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(self.listener, app).await {
                tracing::error!("rendezvous server error: {}", e);
            }
        });

        RendezvousHandle { task }
    }
}

async fn handle_lookup(
    Path(code): Path<String>,
    State(ports): State<PortMap>,
) -> std::result::Result<String, StatusCode> {
    match ports.read().await.get(&code) {
        Some(port) => {
            tracing::debug!("rendezvous lookup for {:?} -> {}", code, port);
            Ok(port.clone())
        }
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// Handle to the running rendezvous server
pub struct RendezvousHandle {
    task: tokio::task::JoinHandle<()>,
}

impl RendezvousHandle {
    /// Stop the server. An abrupt close is fine; sessions are one-shot.
    pub fn abort(self) {
        self.task.abort();
    }
}

/// Resolve a code to the sender's data port via its rendezvous server.
pub async fn lookup(host: IpAddr, rendezvous_port: u16, code: &str) -> Result<u16> {
    let url = format!("http://{}:{}/{}", host, rendezvous_port, code);

    let response = reqwest::get(&url)
        .await
        .map_err(|e| Error::Rendezvous(format!("could not contact rendezvous server: {}", e)))?;

    if !response.status().is_success() {
        return Err(Error::Rendezvous(format!(
            "rendezvous server returned {} (code not registered?)",
            response.status()
        )));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| Error::Rendezvous(e.to_string()))?;
    let body = String::from_utf8_lossy(&body);

    body.trim()
        .parse::<u16>()
        .map_err(|_| Error::Rendezvous(format!("non-numeric port in response: {:?}", body)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_roundtrip() {
        let server = RendezvousServer::bind(0).await.unwrap();
        let addr = server.local_addr().unwrap();
        server.register("kite-moon-robot", 45871).await;
        let handle = server.start();

        let port = lookup(IpAddr::from([127, 0, 0, 1]), addr.port(), "kite-moon-robot")
            .await
            .unwrap();
        assert_eq!(port, 45871);

        handle.abort();
    }

    #[tokio::test]
    async fn test_unknown_code_is_not_found() {
        let server = RendezvousServer::bind(0).await.unwrap();
        let addr = server.local_addr().unwrap();
        let handle = server.start();

        let result = lookup(IpAddr::from([127, 0, 0, 1]), addr.port(), "no-such-code").await;
        assert!(matches!(result, Err(Error::Rendezvous(_))));

        handle.abort();
    }
}
