//! Sitemap middleware.
//!
//! Serves the synthesized sitemap and robots.txt, and observes every other
//! request on its way through the next handler: the response is captured,
//! optionally rewritten, and its URL recorded when it was a non-ignored 200.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::{ConfigError, SitemapConfig};
use crate::http::request::request_id;
use crate::http::response::CapturedResponse;
use crate::http::rewrite::{rewrite_response, AnalyticsInjector, RewriteOutcome};
use crate::observability::metrics;
use crate::routing::{Origin, RouteKind, SeoRouter};
use crate::sitemap::{build_robots, build_sitemap, PathRegistry};

/// Immutable middleware configuration plus the shared registry.
#[derive(Debug)]
pub struct SeoState {
    router: SeoRouter,
    registry: Arc<PathRegistry>,
    injector: Option<AnalyticsInjector>,
    default_scheme: String,
}

impl SeoState {
    pub fn new(
        config: &SitemapConfig,
        default_scheme: impl Into<String>,
        registry: Arc<PathRegistry>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            router: SeoRouter::from_config(config)?,
            registry,
            injector: config.analytics_id().map(AnalyticsInjector::new),
            default_scheme: default_scheme.into(),
        })
    }

    pub fn registry(&self) -> &Arc<PathRegistry> {
        &self.registry
    }

    fn serve_sitemap(&self, origin: &Origin) -> Response {
        match build_sitemap(self.registry.snapshot(), Some(origin)) {
            Ok(xml) => {
                metrics::record_document_served("sitemap");
                ([(header::CONTENT_TYPE, "application/xml")], xml).into_response()
            }
            Err(e) => {
                tracing::error!(error = %e, host = %origin.host(), "Sitemap build failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }

    fn serve_robots(&self, origin: &Origin) -> Response {
        metrics::record_document_served("robots");
        let robots = build_robots(origin, self.router.sitemap_path());
        ([(header::CONTENT_TYPE, "text/plain")], robots).into_response()
    }
}

pub async fn seo_middleware(
    State(seo): State<Arc<SeoState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let origin = Origin::from_request(&request, &seo.default_scheme);

    let ignored = match seo.router.classify(&path) {
        RouteKind::Sitemap => return seo.serve_sitemap(&origin),
        RouteKind::Robots => return seo.serve_robots(&origin),
        RouteKind::Forward { ignored } => ignored,
    };

    let request_id = request_id(&request);
    let response = next.run(request).await;

    let captured = match CapturedResponse::capture(response).await {
        Ok(captured) => captured,
        Err(e) => {
            tracing::warn!(request_id = %request_id, path = %path, error = %e, "Failed to buffer downstream response");
            return (StatusCode::BAD_GATEWAY, "Upstream response failed").into_response();
        }
    };

    // The recording decision uses the status as produced downstream, before
    // any rewrite.
    let status = captured.status();
    let (captured, outcome) = rewrite_response(captured, seo.injector.as_ref());
    if outcome != RewriteOutcome::Skipped {
        metrics::record_rewrite(outcome.as_str());
        tracing::debug!(request_id = %request_id, path = %path, outcome = outcome.as_str(), "HTML rewrite");
    }

    if !ignored && status == StatusCode::OK {
        let url = origin.canonical_url(&path);
        if seo.registry.record(url.clone()) {
            tracing::debug!(request_id = %request_id, url = %url, "Observed new path");
        }
    }

    captured.into_response()
}
