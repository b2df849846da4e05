//! HTTP client side of the verification run.

use std::net::SocketAddr;

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;

use twin_listeners::{ListenerConfig, ListenerKind, RunningListeners, ServerError};

use crate::error::VerifyError;

/// Addresses of the two listeners under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    pub api: SocketAddr,
    pub web: SocketAddr,
}

impl Endpoints {
    /// Endpoints of listeners already running as described by `config`.
    pub fn from_config(config: &ListenerConfig) -> Result<Self, ServerError> {
        Ok(Self {
            api: config.api_addr()?,
            web: config.web_addr()?,
        })
    }

    /// Endpoints of listeners started in-process.
    pub fn from_running(listeners: &RunningListeners) -> Self {
        Self {
            api: listeners.api_addr(),
            web: listeners.web_addr(),
        }
    }

    pub fn addr(&self, kind: ListenerKind) -> SocketAddr {
        match kind {
            ListenerKind::Api => self.api,
            ListenerKind::Web => self.web,
        }
    }
}

/// What came back for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observed {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

/// Issues requests against both listeners.
#[derive(Debug, Clone)]
pub struct Verifier {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl Verifier {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoints,
        }
    }

    /// Sends `method path` to the given listener with an empty JSON-typed
    /// request and collects the response.
    pub async fn make_request(
        &self,
        kind: ListenerKind,
        method: Method,
        path: &str,
    ) -> Result<Observed, VerifyError> {
        let url = format!("http://{}{}", self.endpoints.addr(kind), path);
        let request_error = |source: reqwest::Error| VerifyError::Request {
            url: url.clone(),
            source,
        };

        let response = self
            .client
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.map_err(request_error)?;

        tracing::debug!("{} {} -> {} {:?}", kind, url, status, body);
        Ok(Observed {
            status,
            content_type,
            body,
        })
    }

    /// Smoke run against the API listener: POST then GET.
    pub async fn test_api_server(&self) -> Result<(), VerifyError> {
        println!("\n=== Testing API Server ({}) ===", self.endpoints.api);
        self.smoke(ListenerKind::Api, Method::POST).await?;
        self.smoke(ListenerKind::Api, Method::GET).await
    }

    /// Smoke run against the Web listener: GET then POST.
    pub async fn test_web_server(&self) -> Result<(), VerifyError> {
        println!("\n=== Testing Web Server ({}) ===", self.endpoints.web);
        self.smoke(ListenerKind::Web, Method::GET).await?;
        self.smoke(ListenerKind::Web, Method::POST).await
    }

    async fn smoke(&self, kind: ListenerKind, method: Method) -> Result<(), VerifyError> {
        println!("Testing {} request...", method);
        let observed = self.make_request(kind, method.clone(), "/").await?;
        println!(
            "{} Response: {} - \"{}\"",
            method, observed.status, observed.body
        );
        Ok(())
    }
}
