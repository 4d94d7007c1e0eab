//! Preview image generation pipeline.
//!
//! One entry per enumerated document, fanned out across worker tasks.
//! Rendering and PNG encoding are CPU work and run on blocking threads
//! behind a small semaphore so a large batch cannot starve the runtime.
//!
//! The bundle written under the output directory:
//!
//! ```text
//! og/<route>.png        rendered canvas
//! og/<route>.json       descriptor for the downstream text rasterizer
//! og/fonts/<name>.ttf   fetched font assets, shared across routes
//! og/manifest.json      route -> generated file paths
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::OgError;
use super::fonts::{FontFetcher, FontSet};
use super::options::{OgImageEntry, OgImageOptions};
use super::render::render_png;
use crate::content::ContentSource;

/// Maximum concurrent renders. Encoding 1200x630 PNGs is CPU-bound.
const MAX_CONCURRENT_RENDERS: usize = 4;

/// Generated file paths for one route, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub image: String,
    pub descriptor: String,
}

/// Static mapping from route to generated files, written as
/// `og/manifest.json` for the page-serving layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OgManifest {
    pub routes: BTreeMap<String, ManifestEntry>,
}

impl OgManifest {
    fn insert(&mut self, route: &str) {
        self.routes.insert(
            route.to_string(),
            ManifestEntry {
                image: format!("og/{route}.png"),
                descriptor: format!("og/{route}.json"),
            },
        );
    }
}

/// One document that did not get a preview image, and why.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationFailure {
    /// Route, or the source path when the document never produced one.
    pub route: String,
    pub reason: String,
}

/// Outcome of one generation batch.
#[derive(Debug, Default, Serialize)]
pub struct GenerationReport {
    /// Images written.
    pub generated: usize,

    /// Font files bundled alongside the images.
    pub fonts: usize,

    /// Documents skipped, each with its reason.
    pub failures: Vec<GenerationFailure>,
}

impl GenerationReport {
    /// Number of documents that did not get an image.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Whether every document got an image.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, route: impl Into<String>, reason: impl ToString) {
        self.failures.push(GenerationFailure {
            route: route.into(),
            reason: reason.to_string(),
        });
    }
}

/// Build one descriptor entry per enumerable document.
///
/// Documents that fail to load come back as failures keyed by their file
/// path; the rest of the batch is unaffected.
pub fn collect_entries(source: &ContentSource) -> (Vec<OgImageEntry>, Vec<GenerationFailure>) {
    let mut entries = Vec::new();
    let mut failures = Vec::new();

    for result in source.documents() {
        match result {
            Ok(document) => entries.push(OgImageEntry {
                route: document.route.clone(),
                options: OgImageOptions::for_document(&document),
            }),
            Err(e) => {
                warn!(error = %e, "document skipped");
                let label = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<walk>".to_string());
                failures.push(GenerationFailure {
                    route: label,
                    reason: e.to_string(),
                });
            }
        }
    }

    (entries, failures)
}

/// Generates the Open Graph bundle for a content source.
#[derive(Debug, Clone)]
pub struct OgGenerator {
    output_dir: PathBuf,
    max_renders: usize,
}

impl OgGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            max_renders: MAX_CONCURRENT_RENDERS,
        }
    }

    /// Cap concurrent renders (minimum 1).
    pub fn max_renders(mut self, n: usize) -> Self {
        self.max_renders = n.max(1);
        self
    }

    /// Full pipeline: enumerate documents, fetch the fonts their
    /// descriptors name, then render and write the bundle.
    pub async fn run(
        &self,
        source: &ContentSource,
        fetcher: &FontFetcher,
    ) -> Result<GenerationReport, OgError> {
        let (entries, skipped) = collect_entries(source);
        info!(
            documents = entries.len(),
            skipped = skipped.len(),
            "collected preview image entries"
        );

        let fonts = fetcher
            .fetch_all(entries.iter().flat_map(|e| e.options.fonts.iter()))
            .await;

        let mut report = self.generate(entries, &fonts).await?;
        report.failures.extend(skipped);
        Ok(report)
    }

    /// Render and write the bundle for already-built entries against an
    /// already-fetched font set.
    ///
    /// Failures stay per entry; only output-directory io is batch-fatal.
    pub async fn generate(
        &self,
        entries: Vec<OgImageEntry>,
        fonts: &FontSet,
    ) -> Result<GenerationReport, OgError> {
        let og_dir = self.output_dir.join("og");
        std::fs::create_dir_all(&og_dir).map_err(|source| OgError::Io {
            path: og_dir.clone(),
            source,
        })?;
        fonts.write_to(&og_dir.join("fonts"))?;

        let mut report = GenerationReport {
            fonts: fonts.len(),
            ..Default::default()
        };
        let semaphore = Arc::new(Semaphore::new(self.max_renders));
        let mut tasks: JoinSet<Result<String, (String, OgError)>> = JoinSet::new();

        for entry in entries {
            if !valid_route(&entry.route) {
                warn!(route = %entry.route, "route escapes the output directory");
                report.record(&entry.route, "route escapes the output directory");
                continue;
            }

            // A document whose font never arrived fails here, before any
            // of its files are written. There is no fallback face.
            if let Some(err) = entry.options.fonts.iter().find_map(|url| fonts.get(url).err()) {
                warn!(route = %entry.route, error = %err, "preview image skipped");
                report.record(&entry.route, err);
                continue;
            }

            let semaphore = Arc::clone(&semaphore);
            let og_dir = og_dir.clone();
            tasks.spawn(async move {
                let route = entry.route.clone();
                let _permit = semaphore.acquire_owned().await.map_err(|_| {
                    (
                        route.clone(),
                        OgError::Render("render semaphore closed".to_string()),
                    )
                })?;

                let result = tokio::task::spawn_blocking(move || write_entry(&og_dir, &entry)).await;
                match result {
                    Ok(Ok(())) => Ok(route),
                    Ok(Err(e)) => Err((route, e)),
                    Err(e) => Err((route, OgError::Render(format!("render task panicked: {e}")))),
                }
            });
        }

        let mut manifest = OgManifest::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(route)) => {
                    debug!(route = %route, "preview image generated");
                    manifest.insert(&route);
                    report.generated += 1;
                }
                Ok(Err((route, e))) => {
                    warn!(route = %route, error = %e, "preview image failed");
                    report.record(&route, e);
                }
                Err(e) => {
                    warn!(error = %e, "generation task failed");
                    report.record("<unknown>", format!("task join error: {e}"));
                }
            }
        }

        let manifest_path = og_dir.join("manifest.json");
        let json = serde_json::to_vec_pretty(&manifest)?;
        std::fs::write(&manifest_path, json).map_err(|source| OgError::Io {
            path: manifest_path,
            source,
        })?;

        info!(
            generated = report.generated,
            failed = report.failed(),
            fonts = report.fonts,
            "preview image batch finished"
        );
        Ok(report)
    }
}

/// Render one entry and write its image and descriptor. Runs on a
/// blocking thread.
fn write_entry(og_dir: &Path, entry: &OgImageEntry) -> Result<(), OgError> {
    let logo = std::fs::read(&entry.options.logo.path).map_err(|e| OgError::Logo {
        path: entry.options.logo.path.clone(),
        reason: e.to_string(),
    })?;
    let png = render_png(&entry.options, &logo)?;

    let image_path = og_dir.join(format!("{}.png", entry.route));
    if let Some(parent) = image_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| OgError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(&image_path, png).map_err(|source| OgError::Io {
        path: image_path,
        source,
    })?;

    let descriptor_path = og_dir.join(format!("{}.json", entry.route));
    let descriptor = serde_json::to_vec_pretty(&entry.options)?;
    std::fs::write(&descriptor_path, descriptor).map_err(|source| OgError::Io {
        path: descriptor_path,
        source,
    })?;
    Ok(())
}

/// A route must stay under the output directory when joined onto it.
/// Component-by-component so that normalization cannot bypass the check.
fn valid_route(route: &str) -> bool {
    if route.is_empty() || route.contains('\0') {
        return false;
    }
    if route.starts_with('/') || route.starts_with('\\') {
        return false;
    }
    route
        .split(['/', '\\'])
        .all(|part| !part.is_empty() && part != "." && part != "..")
}
