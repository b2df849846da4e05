//! Verification client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    /// Request could not be sent or its body could not be read
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
