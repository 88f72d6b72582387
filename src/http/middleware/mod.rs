//! Axum middleware installed in front of the forwarding handler.

pub mod seo;

pub use seo::{seo_middleware, SeoState};
