//! Method dispatch for the two listener kinds.

use std::fmt;

use hyper::{body::Bytes, Method, Request, Response};
use thiserror::Error;

use crate::handlers;

/// Which contract a listener implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Accepts POST only
    Api,
    /// Accepts every method
    Web,
}

impl ListenerKind {
    /// Label used in log lines ("API", "Web").
    pub fn label(&self) -> &'static str {
        match self {
            ListenerKind::Api => "API",
            ListenerKind::Web => "Web",
        }
    }
}

impl fmt::Display for ListenerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// HTTP request router.
///
/// Path and query are never inspected; only the API listener looks at
/// the method.
#[derive(Debug, Clone, Copy)]
pub struct Router {
    kind: ListenerKind,
}

impl Router {
    /// Creates a router for the given listener kind.
    pub fn new(kind: ListenerKind) -> Self {
        Self { kind }
    }

    /// Router of the API listener.
    pub fn api() -> Self {
        Self::new(ListenerKind::Api)
    }

    /// Router of the Web listener.
    pub fn web() -> Self {
        Self::new(ListenerKind::Web)
    }

    pub fn kind(&self) -> ListenerKind {
        self.kind
    }

    /// Routes a request to its canned response.
    ///
    /// # Returns
    /// `Ok` with the success response, or `RouterError::MethodNotAllowed`
    /// for a non-POST request to the API listener.
    pub fn route<B>(&self, req: &Request<B>) -> Result<Response<Bytes>, RouterError> {
        let target = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        tracing::info!("{} Request: {} {}", self.kind, req.method(), target);

        match self.kind {
            ListenerKind::Api if req.method() != Method::POST => Err(RouterError::MethodNotAllowed),
            ListenerKind::Api | ListenerKind::Web => Ok(handlers::request_completed()),
        }
    }

    /// Routes a request, turning router errors into their HTTP response.
    pub fn respond<B>(&self, req: &Request<B>) -> Response<Bytes> {
        self.route(req).unwrap_or_else(Response::from)
    }
}

/// Router error type.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterError {
    /// Non-POST request sent to the API listener
    #[error("Method Not Allowed")]
    MethodNotAllowed,
}

impl From<RouterError> for Response<Bytes> {
    fn from(err: RouterError) -> Self {
        match err {
            RouterError::MethodNotAllowed => handlers::method_not_allowed(),
        }
    }
}
