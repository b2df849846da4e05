//! Verification client for the canned-response listeners.
//!
//! Issues requests against the API and Web listeners as a black box and
//! compares status, content type and body with the expected canned
//! responses.

pub mod client;
pub mod error;
pub mod statements;

pub use client::{Endpoints, Observed, Verifier};
pub use error::VerifyError;
pub use statements::{Expectation, Report, Statement, StatementOutcome};
