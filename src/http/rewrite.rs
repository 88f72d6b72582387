//! HTML analytics injection.
//!
//! # Responsibilities
//! - Decide whether a captured response is eligible for rewriting
//! - Gunzip, inject the tag-manager snippets, re-gzip
//! - Fall back to the untouched capture on any codec failure
//!
//! # Design Decisions
//! - Works on raw bytes so non-UTF-8 documents are never mangled
//! - Only 200 `text/html` responses are touched; everything else is
//!   replayed byte-for-byte, headers included
//! - `</head>` is a literal, case-sensitive match; `<body ...>` is matched
//!   case-insensitively with attributes. Each is inserted at most once

use std::io::{Read, Write};
use std::sync::LazyLock;

use axum::http::{header, StatusCode};
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use regex::bytes::Regex;

use crate::http::response::CapturedResponse;

const SCRIPT_TEMPLATE: &str = r#"<!-- Google Tag Manager -->
<script>(function(w,d,s,l,i){w[l]=w[l]||[];w[l].push({'gtm.start':
new Date().getTime(),event:'gtm.js'});var f=d.getElementsByTagName(s)[0],
j=d.createElement(s),dl=l!='dataLayer'?'&l='+l:'';j.async=true;j.src=
'https://www.googletagmanager.com/gtm.js?id='+i+dl;f.parentNode.insertBefore(j,f);
})(window,document,'script','dataLayer','{container_id}');</script>
<!-- End Google Tag Manager -->"#;

const NOSCRIPT_TEMPLATE: &str = r#"<!-- Google Tag Manager (noscript) -->
<noscript><iframe src="https://www.googletagmanager.com/ns.html?id={container_id}"
height="0" width="0" style="display:none;visibility:hidden"></iframe></noscript>
<!-- End Google Tag Manager (noscript) -->"#;

const HEAD_CLOSE: &[u8] = b"</head>";

static BODY_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i-u)<body\b[^>]*>").expect("valid <body> pattern"));

/// What happened to a captured response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// Not eligible; replayed unchanged.
    Skipped,
    /// Snippets injected (where markers were found).
    Injected,
    /// Gzip body could not be decoded; replayed unchanged.
    DecompressFailed,
    /// Mutated body could not be re-encoded; original replayed.
    RecompressFailed,
}

impl RewriteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::Injected => "injected",
            Self::DecompressFailed => "decompress_failed",
            Self::RecompressFailed => "recompress_failed",
        }
    }
}

/// Renders and inserts the tag-manager snippets for one container.
#[derive(Debug, Clone)]
pub struct AnalyticsInjector {
    script: String,
    noscript: String,
}

impl AnalyticsInjector {
    pub fn new(container_id: &str) -> Self {
        Self {
            script: SCRIPT_TEMPLATE.replace("{container_id}", container_id),
            noscript: NOSCRIPT_TEMPLATE.replace("{container_id}", container_id),
        }
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn noscript(&self) -> &str {
        &self.noscript
    }

    /// Insert the script before the first `</head>` and the noscript block
    /// right after the first `<body>` tag. Missing markers are skipped.
    pub fn inject(&self, html: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(html.len() + self.script.len() + self.noscript.len());

        match find(html, HEAD_CLOSE) {
            Some(pos) => {
                out.extend_from_slice(&html[..pos]);
                out.extend_from_slice(self.script.as_bytes());
                out.extend_from_slice(&html[pos..]);
            }
            None => out.extend_from_slice(html),
        }

        if let Some(end) = BODY_OPEN_RE.find(&out).map(|m| m.end()) {
            out.splice(end..end, self.noscript.bytes());
        }

        out
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn gunzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoded = Vec::new();
    MultiGzDecoder::new(data).read_to_end(&mut decoded)?;
    Ok(decoded)
}

fn gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

fn is_html(captured: &CapturedResponse) -> bool {
    captured
        .header_str(header::CONTENT_TYPE)
        .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("text/html"))
}

fn is_gzip(captured: &CapturedResponse) -> bool {
    captured
        .header_str(header::CONTENT_ENCODING)
        .is_some_and(|ce| ce.trim().eq_ignore_ascii_case("gzip"))
}

/// Apply analytics injection to `captured` if it qualifies.
pub fn rewrite_response(
    mut captured: CapturedResponse,
    injector: Option<&AnalyticsInjector>,
) -> (CapturedResponse, RewriteOutcome) {
    let Some(injector) = injector else {
        return (captured, RewriteOutcome::Skipped);
    };
    if captured.status() != StatusCode::OK || !is_html(&captured) {
        return (captured, RewriteOutcome::Skipped);
    }

    let gzipped = is_gzip(&captured);

    let html = if gzipped {
        match gunzip(captured.body()) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::debug!(error = %e, "gzip body could not be decoded, passing through");
                return (captured, RewriteOutcome::DecompressFailed);
            }
        }
    } else {
        captured.body().to_vec()
    };

    let mutated = injector.inject(&html);

    let body = if gzipped {
        match gzip(&mutated) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!(error = %e, "gzip re-encoding failed, passing through");
                return (captured, RewriteOutcome::RecompressFailed);
            }
        }
    } else {
        mutated
    };

    captured.replace_body(body);
    (captured, RewriteOutcome::Injected)
}
