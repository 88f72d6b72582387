//! Ignore-pattern matching.
//!
//! # Responsibilities
//! - Compile user-supplied ignore patterns followed by the built-in defaults
//! - Decide whether a request path is excluded from the sitemap
//!
//! # Design Decisions
//! - Unanchored search: a pattern matches anywhere in the path unless it
//!   anchors itself
//! - OR semantics, first match short-circuits
//! - Defaults are always active; user patterns only add exclusions

use regex::Regex;

use crate::config::ConfigError;

/// Noise that never belongs in a sitemap: probes for leaked config and
/// backups, CMS scanners, framework internals and static assets.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    r"(?i)\.env",
    r"(?i)\.bak",
    r"(?i)\.old",
    r"(?i)\.example",
    r"(?i)\.exmaple",
    r"(?i)\.sample",
    r"(?i)\.tmpl",
    r"(?i)\.tpl",
    r"(?i)\.dist",
    r"(?i)\.~",
    r"(?i)\.php",
    r"(?i)\.aspx",
    r"(?i)config",
    r"(?i)wp-",
    r"(?i)sitemap",
    r"(?i)undefined",
    r"^/_next/*",
    r"(?i)\.(jpg|jpeg|png|gif|webp|svg|bmp|tif|tiff|ico|txt|php|exe|css|js|json|pdf|doc|docx|xls|xlsx|ppt|pptx|mp3|mp4|avi|mov|zip|rar|tar|gz|env|html|xml)$",
];

/// Ordered set of compiled ignore patterns. Immutable after construction.
#[derive(Debug, Clone)]
pub struct MatcherSet {
    patterns: Vec<Regex>,
}

impl MatcherSet {
    /// Compile user patterns, then append the built-in defaults.
    pub fn compile<S: AsRef<str>>(user_patterns: &[S]) -> Result<Self, ConfigError> {
        let user = user_patterns.iter().map(AsRef::as_ref);
        let patterns = user
            .chain(DEFAULT_IGNORE_PATTERNS.iter().copied())
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// True if any pattern matches anywhere in `path`.
    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(path))
    }
}
