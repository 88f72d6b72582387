//! robots.txt synthesis.

use crate::routing::Origin;

/// Allow every crawler and point it at the sitemap on the same origin.
pub fn build_robots(origin: &Origin, sitemap_path: &str) -> String {
    format!("User-agent: *\nSitemap: {}{}\n", origin.base(), sitemap_path)
}
