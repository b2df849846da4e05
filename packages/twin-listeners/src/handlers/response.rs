//! Canned responses.

use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};

/// Body of every accepted request.
pub const REQUEST_COMPLETED: &str = "Request Completed";

/// Body of a rejected API request.
pub const API_METHOD_NOT_ALLOWED: &str =
    "Method Not Allowed - Only POST requests are accepted for API";

/// Content type carried by every response.
pub const TEXT_HTML: &str = "text/html";

/// Shared success response: 200, `text/html`, "Request Completed".
pub fn request_completed() -> Response<Bytes> {
    html_response(StatusCode::OK, REQUEST_COMPLETED)
}

/// API rejection: 405, `text/html`, fixed explanation.
pub fn method_not_allowed() -> Response<Bytes> {
    html_response(StatusCode::METHOD_NOT_ALLOWED, API_METHOD_NOT_ALLOWED)
}

fn html_response(status: StatusCode, body: &'static str) -> Response<Bytes> {
    let mut response = Response::new(Bytes::from_static(body.as_bytes()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_HTML));
    response
}
