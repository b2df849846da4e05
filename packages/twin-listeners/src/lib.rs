//! Canned-response HTTP listeners.
//!
//! Provides the API listener (POST only), the Web listener (any method),
//! the shared response writer both use, and the lifecycle objects that
//! bind, serve and drain them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod listeners;
pub mod router;
pub mod server;

pub use config::ListenerConfig;
pub use error::ServerError;
pub use listeners::{Listeners, RunningListeners};
pub use router::{ListenerKind, Router, RouterError};
pub use server::{BoundServer, Server, ServerHandle};
