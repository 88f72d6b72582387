//! Response capture.
//!
//! # Responsibilities
//! - Buffer the downstream response (status, headers, body) in full
//! - Expose it for inspection and rewriting
//! - Replay it to the client unchanged unless explicitly rewritten
//!
//! # Design Decisions
//! - Whole-body buffering: length-sensitive headers can only be finalized
//!   after decompression and substitution
//! - Response parts (version, extensions) are kept as-is for replay

use axum::body::{Body, Bytes};
use axum::http::{header, response::Parts, HeaderMap, HeaderName, StatusCode};
use axum::response::Response;

/// A fully buffered downstream response.
#[derive(Debug)]
pub struct CapturedResponse {
    parts: Parts,
    body: Bytes,
}

impl CapturedResponse {
    /// Drain `response` into memory.
    pub async fn capture(response: Response) -> Result<Self, axum::Error> {
        let (parts, body) = response.into_parts();
        let body = axum::body::to_bytes(body, usize::MAX).await?;
        Ok(Self { parts, body })
    }

    pub fn status(&self) -> StatusCode {
        self.parts.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Header value as text, if present and visible ASCII.
    pub fn header_str(&self, name: HeaderName) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Swap in a rewritten body. The declared length no longer holds, so it
    /// is dropped and the server frames the body itself.
    pub fn replace_body(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
        self.parts.headers.remove(header::CONTENT_LENGTH);
    }

    pub fn into_response(self) -> Response {
        Response::from_parts(self.parts, Body::from(self.body))
    }
}
