//! Periodic sitemap persistence.
//!
//! # Responsibilities
//! - Regenerate the full (unfiltered) sitemap on a fixed interval
//! - Replace the output file atomically
//!
//! # Design Decisions
//! - Runs on its own task, so a stalled disk never delays requests
//! - Uses the same snapshot/build path as the on-demand route
//! - Failures are logged and retried on the next tick

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{self, Instant};

use crate::observability::metrics;
use crate::sitemap::builder::{build_sitemap, SitemapError};
use crate::sitemap::registry::PathRegistry;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error(transparent)]
    Build(#[from] SitemapError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub struct SitemapPersister {
    registry: Arc<PathRegistry>,
    output_file: PathBuf,
    interval: Duration,
}

impl SitemapPersister {
    pub fn new(registry: Arc<PathRegistry>, output_file: impl Into<PathBuf>, interval: Duration) -> Self {
        Self {
            registry,
            output_file: output_file.into(),
            interval,
        }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            path = %self.output_file.display(),
            interval_secs = self.interval.as_secs(),
            "Sitemap persister starting"
        );

        if self.interval.is_zero() {
            tracing::error!(path = %self.output_file.display(), "Sitemap persist interval is zero, not starting");
            return;
        }

        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.persist_once().await {
                        Ok(count) => {
                            metrics::record_persist("ok");
                            tracing::debug!(path = %self.output_file.display(), urls = count, "Sitemap written");
                        }
                        Err(e) => {
                            metrics::record_persist("error");
                            tracing::warn!(error = %e, "Sitemap write failed");
                        }
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Sitemap persister received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Build and write the sitemap once. Returns the number of URLs written.
    pub async fn persist_once(&self) -> Result<usize, PersistError> {
        let snapshot = self.registry.snapshot();
        let count = snapshot.len();
        let xml = build_sitemap(snapshot, None)?;
        write_atomically(&self.output_file, &xml).await?;
        Ok(count)
    }
}

/// Write to a sibling temp file, then rename over `path`.
pub async fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), PersistError> {
    let io_err = |source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await.map_err(io_err)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, contents).await.map_err(io_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(io_err)
}
