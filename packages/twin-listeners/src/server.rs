//! Hyper server setup and request handling.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming as IncomingBody};
use hyper::server::conn::http1;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::ServerError;
use crate::router::{ListenerKind, Router};

/// An HTTP listener that has been configured but not bound.
#[derive(Debug, Clone)]
pub struct Server {
    addr: SocketAddr,
    router: Router,
}

impl Server {
    /// Creates a new server instance. Nothing is bound until [`Server::bind`].
    ///
    /// # Arguments
    /// * `addr` - Socket address to bind to
    /// * `router` - Request router
    pub fn new(addr: SocketAddr, router: Router) -> Self {
        Self { addr, router }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Binds the listening socket.
    ///
    /// # Returns
    /// A [`BoundServer`] that has not yet accepted any connection.
    pub async fn bind(self) -> Result<BoundServer, ServerError> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: self.addr,
                source,
            })?;
        let local_addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

        Ok(BoundServer {
            listener,
            local_addr,
            router: self.router,
        })
    }
}

/// A listener whose port is bound but which is not yet accepting.
#[derive(Debug)]
pub struct BoundServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    router: Router,
}

impl BoundServer {
    /// Address actually bound (resolves port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accepts connections until `signal` resolves, then stops accepting
    /// and waits for in-flight connections to finish.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        let BoundServer {
            listener,
            local_addr,
            router,
        } = self;
        let kind = router.kind();
        let graceful = GracefulShutdown::new();
        tokio::pin!(signal);

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(accepted) => accepted,
                        Err(err) => {
                            accept_error_backoff(kind, &err).await;
                            continue;
                        }
                    };
                    let io = TokioIo::new(stream);
                    let connection = http1::Builder::new().serve_connection(
                        io,
                        hyper::service::service_fn(move |req| handle_request(req, router)),
                    );
                    let connection = graceful.watch(connection);

                    tokio::task::spawn(async move {
                        if let Err(err) = connection.await {
                            tracing::debug!("Error serving connection from {}: {}", peer, err);
                        }
                    });
                }
                _ = &mut signal => break,
            }
        }

        drop(listener);
        tracing::info!("{} listener on {} stopped accepting; draining", kind, local_addr);
        graceful.shutdown().await;
        tracing::info!("{} listener on {} drained", kind, local_addr);
        Ok(())
    }

    /// Starts the accept loop on a background task.
    ///
    /// Dropping the returned handle without calling
    /// [`ServerHandle::shutdown`] also stops the listener.
    pub fn spawn(self) -> ServerHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let local_addr = self.local_addr;
        let task = tokio::task::spawn(self.serve_with_shutdown(async move {
            let _ = shutdown_rx.await;
        }));

        ServerHandle {
            local_addr,
            shutdown_tx,
            task,
        }
    }
}

/// Handle to a running listener.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<Result<(), ServerError>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting and waits for in-flight connections to drain.
    pub async fn shutdown(self) -> Result<(), ServerError> {
        // Receiver is gone only if the accept loop already exited.
        let _ = self.shutdown_tx.send(());
        self.task.await?
    }
}

/// Pause after a failed `accept()` before retrying.
pub const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Logs a failed `accept()` and waits before the next attempt.
async fn accept_error_backoff(kind: ListenerKind, err: &std::io::Error) {
    tracing::warn!(
        "{} listener failed to accept connection: {}; retrying in {:?}",
        kind,
        err,
        ACCEPT_ERROR_BACKOFF
    );
    tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
}

/// Handles an incoming HTTP request.
async fn handle_request(
    req: Request<IncomingBody>,
    router: Router,
) -> Result<Response<Full<Bytes>>, Infallible> {
    Ok(router.respond(&req).map(Full::new))
}
