//! Sitemap subsystem.
//!
//! # Data Flow
//! ```text
//! Successful, non-ignored response
//!     → registry.rs (record canonical URL)
//!
//! GET <sitemap_path>
//!     → registry.rs (snapshot, lock released)
//!     → builder.rs (filter by origin, sort, prioritize, serialize)
//!
//! GET <robots_path>
//!     → robots.rs (templated, no registry access)
//!
//! Every persist interval (optional):
//!     → persist.rs → builder.rs (no origin) → atomic file write
//! ```

pub mod builder;
pub mod persist;
pub mod registry;
pub mod robots;

pub use builder::{build_sitemap, SitemapError};
pub use persist::{PersistError, SitemapPersister};
pub use registry::PathRegistry;
pub use robots::build_robots;
