//! Listener lifecycle errors.

use std::net::SocketAddr;

use thiserror::Error;

/// Errors raised while binding, serving or stopping a listener.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Host/port pair does not form a socket address
    #[error("Invalid listen address '{0}'")]
    InvalidAddress(String),

    /// Port could not be bound
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Bound socket could not report its address
    #[error("Failed to read local address: {0}")]
    LocalAddr(#[source] std::io::Error),

    /// Accept loop task panicked or was cancelled
    #[error("Listener task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
