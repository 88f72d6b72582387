//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and route paths
//! - Compile ignore patterns so a broken set never reaches the middleware
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must start with '/' (got {value:?})")]
    RelativePath { field: &'static str, value: String },

    #[error("sitemap_path and robots_path must differ (both {0:?})")]
    DuplicatePath(String),

    #[error("{field} is not a valid socket address: {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("ignore pattern {pattern:?} does not compile: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("persist_interval_secs must be greater than zero when output_file is set")]
    ZeroPersistInterval,

    #[error("request_secs must be greater than zero")]
    ZeroRequestTimeout,
}

/// Check a parsed configuration for semantic problems.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let sitemap = &config.sitemap;

    for (field, value) in [
        ("sitemap_path", &sitemap.sitemap_path),
        ("robots_path", &sitemap.robots_path),
    ] {
        if !value.starts_with('/') {
            errors.push(ValidationError::RelativePath {
                field,
                value: value.clone(),
            });
        }
    }

    if sitemap.sitemap_path == sitemap.robots_path {
        errors.push(ValidationError::DuplicatePath(sitemap.sitemap_path.clone()));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.upstream.address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "upstream.address",
            value: config.upstream.address.clone(),
        });
    }

    for pattern in &sitemap.ignore {
        if let Err(e) = regex::Regex::new(pattern) {
            errors.push(ValidationError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            });
        }
    }

    if sitemap.output_file.is_some() && sitemap.persist_interval_secs == 0 {
        errors.push(ValidationError::ZeroPersistInterval);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
