//! Externally visible origin of a request.
//!
//! The scheme comes from a trusted `X-Forwarded-Proto` header when present,
//! otherwise the request URI, otherwise the listener default. The host comes
//! from the `Host` header, falling back to the URI authority.

use axum::http::{header, Request};

pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// The `scheme://host` a client used to reach us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    scheme: String,
    host: String,
}

impl Origin {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
        }
    }

    /// Resolve the origin of `req`.
    pub fn from_request<B>(req: &Request<B>, default_scheme: &str) -> Self {
        let forwarded = req
            .headers()
            .get(X_FORWARDED_PROTO)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        let scheme = forwarded
            .or_else(|| req.uri().scheme_str())
            .unwrap_or(default_scheme);

        let host = req
            .headers()
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .or_else(|| req.uri().authority().map(|a| a.as_str()))
            .unwrap_or_default();

        Self::new(scheme, host)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// `scheme://host`, the URL of the site root.
    pub fn base(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }

    /// Absolute URL for `path` with one trailing slash removed.
    pub fn canonical_url(&self, path: &str) -> String {
        let path = path.strip_suffix('/').unwrap_or(path);
        format!("{}://{}{}", self.scheme, self.host, path)
    }
}
