//! Sitemap-learning reverse proxy library.
//!
//! Watches traffic on its way to an upstream, remembers every URL that was
//! served successfully, and synthesizes `sitemap.xml` and `robots.txt` from
//! what it has seen. HTML responses can optionally gain a tag-manager
//! snippet on the way out.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod sitemap;

pub use config::schema::ProxyConfig;
pub use http::{seo_middleware, HttpServer, SeoState};
pub use lifecycle::Shutdown;
pub use sitemap::PathRegistry;
