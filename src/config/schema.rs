//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Default route that serves the synthesized sitemap.
pub const DEFAULT_SITEMAP_PATH: &str = "/sitemap.xml";

/// Default route that serves the synthesized robots.txt.
pub const DEFAULT_ROBOTS_PATH: &str = "/robots.txt";

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, scheme fallback).
    pub listener: ListenerConfig,

    /// The upstream every non-synthesized request is forwarded to.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Sitemap, robots.txt and analytics injection settings.
    pub sitemap: SitemapConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Scheme assumed when neither `X-Forwarded-Proto` nor the request URI
    /// carries one.
    pub default_scheme: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            default_scheme: "http".to_string(),
        }
    }
}

/// Upstream (next handler) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream address (e.g., "127.0.0.1:3000").
    pub address: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output flavour.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Sitemap middleware configuration. Fixed at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Route that triggers sitemap synthesis.
    #[serde(alias = "sitemapPath")]
    pub sitemap_path: String,

    /// Route that triggers robots.txt synthesis.
    #[serde(alias = "robotsPath")]
    pub robots_path: String,

    /// Extra exclusion patterns, ORed with the built-in defaults.
    pub ignore: Vec<String>,

    /// Tag-manager container ID. Empty disables HTML rewriting.
    #[serde(alias = "analyticsContainerID", alias = "gtmID")]
    pub analytics_container_id: String,

    /// Where to periodically write the full sitemap. Disabled when unset.
    #[serde(alias = "outputFile")]
    pub output_file: Option<String>,

    /// Seconds between sitemap file writes.
    pub persist_interval_secs: u64,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            sitemap_path: DEFAULT_SITEMAP_PATH.to_string(),
            robots_path: DEFAULT_ROBOTS_PATH.to_string(),
            ignore: Vec::new(),
            analytics_container_id: String::new(),
            output_file: None,
            persist_interval_secs: 60,
        }
    }
}

impl SitemapConfig {
    /// Replace empty route paths with their defaults.
    pub fn apply_defaults(&mut self) {
        if self.sitemap_path.is_empty() {
            self.sitemap_path = DEFAULT_SITEMAP_PATH.to_string();
        }
        if self.robots_path.is_empty() {
            self.robots_path = DEFAULT_ROBOTS_PATH.to_string();
        }
    }

    /// The container ID, if analytics injection is enabled.
    pub fn analytics_id(&self) -> Option<&str> {
        let id = self.analytics_container_id.trim();
        (!id.is_empty()).then_some(id)
    }
}
