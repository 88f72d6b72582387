//! Request classification.
//!
//! # Responsibilities
//! - Recognize the synthesized sitemap and robots.txt routes
//! - Tag every other request with whether it may enter the sitemap
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Exact path equality for the synthesized routes, any method
//! - Ignore matching happens before forwarding so the verdict cannot depend
//!   on the upstream response

use crate::config::{ConfigError, SitemapConfig};
use crate::routing::matcher::MatcherSet;

/// What the middleware should do with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Serve the synthesized sitemap.
    Sitemap,
    /// Serve the synthesized robots.txt.
    Robots,
    /// Forward to the next handler. `ignored` paths are never recorded.
    Forward { ignored: bool },
}

#[derive(Debug, Clone)]
pub struct SeoRouter {
    sitemap_path: String,
    robots_path: String,
    ignores: MatcherSet,
}

impl SeoRouter {
    pub fn from_config(config: &SitemapConfig) -> Result<Self, ConfigError> {
        let mut config = config.clone();
        config.apply_defaults();

        Ok(Self {
            ignores: MatcherSet::compile(config.ignore.as_slice())?,
            sitemap_path: config.sitemap_path,
            robots_path: config.robots_path,
        })
    }

    pub fn classify(&self, path: &str) -> RouteKind {
        if path == self.sitemap_path {
            RouteKind::Sitemap
        } else if path == self.robots_path {
            RouteKind::Robots
        } else {
            RouteKind::Forward {
                ignored: self.ignores.matches(path),
            }
        }
    }

    pub fn sitemap_path(&self) -> &str {
        &self.sitemap_path
    }
}
