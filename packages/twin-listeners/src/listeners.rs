//! The API/Web listener pair and its lifecycle.

use std::net::SocketAddr;

use crate::config::ListenerConfig;
use crate::error::ServerError;
use crate::router::Router;
use crate::server::{Server, ServerHandle};

/// Both listeners, constructed but not bound.
#[derive(Debug, Clone)]
pub struct Listeners {
    api: Server,
    web: Server,
}

impl Listeners {
    /// Builds the API and Web servers from `config` without binding either.
    pub fn new(config: &ListenerConfig) -> Result<Self, ServerError> {
        Ok(Self {
            api: Server::new(config.api_addr()?, Router::api()),
            web: Server::new(config.web_addr()?, Router::web()),
        })
    }

    pub fn api(&self) -> &Server {
        &self.api
    }

    pub fn web(&self) -> &Server {
        &self.web
    }

    /// Binds both ports, then starts accepting on both.
    ///
    /// Neither listener serves traffic unless both binds succeed.
    pub async fn start(self) -> Result<RunningListeners, ServerError> {
        let api = self.api.bind().await?;
        let web = self.web.bind().await?;

        let api = api.spawn();
        tracing::info!("API Server running on http://{}", api.local_addr());
        let web = web.spawn();
        tracing::info!("Web Server running on http://{}", web.local_addr());

        Ok(RunningListeners { api, web })
    }
}

/// Both listeners while they accept traffic.
#[derive(Debug)]
pub struct RunningListeners {
    api: ServerHandle,
    web: ServerHandle,
}

impl RunningListeners {
    pub fn api_addr(&self) -> SocketAddr {
        self.api.local_addr()
    }

    pub fn web_addr(&self) -> SocketAddr {
        self.web.local_addr()
    }

    /// Stops both listeners and waits for their connections to drain.
    ///
    /// Both are stopped even if the first shutdown reports an error; the
    /// first error is returned.
    pub async fn stop(self) -> Result<(), ServerError> {
        let (api, web) = tokio::join!(self.api.shutdown(), self.web.shutdown());
        api.and(web)
    }
}
