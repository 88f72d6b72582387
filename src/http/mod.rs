//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID)
//!     → middleware/seo.rs (sitemap / robots / observe)
//!         → server.rs proxy_handler (forward to upstream)
//!         → response.rs (buffer the upstream response)
//!         → rewrite.rs (analytics injection for HTML)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod rewrite;
pub mod server;

pub use middleware::{seo_middleware, SeoState};
pub use request::X_REQUEST_ID;
pub use response::CapturedResponse;
pub use rewrite::{rewrite_response, AnalyticsInjector, RewriteOutcome};
pub use server::HttpServer;
