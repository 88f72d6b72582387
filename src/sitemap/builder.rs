//! Sitemap synthesis.
//!
//! Turns a registry snapshot into a sitemaps.org `urlset` document. Pure:
//! the only inputs are the snapshot, the requesting origin and the clock.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::routing::Origin;

pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

const ROOT_PRIORITY: f32 = 1.0;
const PAGE_PRIORITY: f32 = 0.8;

#[derive(Debug, thiserror::Error)]
pub enum SitemapError {
    #[error("failed to serialize sitemap: {0}")]
    Xml(String),
}

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: String,
    pub priority: f32,
}

/// Build the sitemap document for `origin`, stamped with the current time.
pub fn build_sitemap(
    snapshot: HashSet<String>,
    origin: Option<&Origin>,
) -> Result<Vec<u8>, SitemapError> {
    build_sitemap_at(snapshot, origin, Utc::now())
}

pub fn build_sitemap_at(
    snapshot: HashSet<String>,
    origin: Option<&Origin>,
    now: DateTime<Utc>,
) -> Result<Vec<u8>, SitemapError> {
    render(&collect_entries(snapshot, origin, now))
}

/// Filter, complete, sort and prioritize the snapshot.
///
/// With an origin, only URLs on that origin survive and the bare origin is
/// always present. Without one (background snapshots) every URL is kept and
/// no root is synthesized.
pub fn collect_entries(
    snapshot: HashSet<String>,
    origin: Option<&Origin>,
    now: DateTime<Utc>,
) -> Vec<SitemapEntry> {
    let base = origin.map(Origin::base);

    let mut locs: Vec<String> = match &base {
        Some(base) => {
            let prefix = format!("{base}/");
            let mut scoped: Vec<String> = snapshot
                .into_iter()
                .filter(|url| url == base || url.starts_with(&prefix))
                .collect();
            if !scoped.iter().any(|url| url == base) {
                scoped.push(base.clone());
            }
            scoped
        }
        None => snapshot.into_iter().collect(),
    };
    locs.sort_unstable();

    let lastmod = now.format("%Y-%m-%dT%H:%M:%SZ").to_string();

    locs.into_iter()
        .map(|loc| {
            let priority = if base.as_deref() == Some(loc.as_str()) {
                ROOT_PRIORITY
            } else {
                PAGE_PRIORITY
            };
            SitemapEntry {
                loc,
                lastmod: lastmod.clone(),
                priority,
            }
        })
        .collect()
}

/// Serialize entries as an indented `urlset` document.
pub fn render(entries: &[SitemapEntry]) -> Result<Vec<u8>, SitemapError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    emit(
        &mut writer,
        Event::Start(BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NAMESPACE)])),
    )?;

    for entry in entries {
        emit(&mut writer, Event::Start(BytesStart::new("url")))?;
        text_element(&mut writer, "loc", &entry.loc)?;
        text_element(&mut writer, "lastmod", &entry.lastmod)?;
        text_element(&mut writer, "priority", &format!("{:.1}", entry.priority))?;
        emit(&mut writer, Event::End(BytesEnd::new("url")))?;
    }

    emit(&mut writer, Event::End(BytesEnd::new("urlset")))?;
    Ok(writer.into_inner())
}

fn text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), SitemapError> {
    emit(writer, Event::Start(BytesStart::new(name)))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), SitemapError> {
    writer
        .write_event(event)
        .map_err(|e| SitemapError::Xml(e.to_string()))
}
