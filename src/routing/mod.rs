//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, path, headers)
//!     → origin.rs (resolve scheme://host)
//!     → router.rs (sitemap? robots? forward?)
//!     → matcher.rs (ignore patterns for forwarded paths)
//!
//! Compilation (at startup):
//!     SitemapConfig.ignore + built-in defaults
//!     → Compile regexes (fail fast on bad patterns)
//!     → Freeze as immutable SeoRouter
//! ```
//!
//! # Design Decisions
//! - Patterns compiled at startup, immutable at runtime
//! - Deterministic: same path always classifies the same way

pub mod matcher;
pub mod origin;
pub mod router;

pub use matcher::MatcherSet;
pub use origin::Origin;
pub use router::{RouteKind, SeoRouter};
