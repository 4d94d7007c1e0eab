//! Font asset fetching.
//!
//! Descriptors name their fonts by URL. Fonts are fetched once per batch
//! and bundled next to the generated images for the downstream text
//! rasterizer; there is no fallback face, so a document whose font is
//! unreachable fails on its own.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use super::OgError;

/// Downloads font assets over HTTP.
pub struct FontFetcher {
    client: reqwest::Client,
}

impl FontFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Fetch every URL once, skipping duplicates.
    ///
    /// A failed fetch is recorded against its URL rather than aborting:
    /// only the documents that need the missing font fail.
    pub async fn fetch_all<I, S>(&self, urls: I) -> FontSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = FontSet::default();
        for url in urls {
            let url = url.as_ref();
            if set.fonts.contains_key(url) || set.failures.contains_key(url) {
                continue;
            }
            match self.fetch(url).await {
                Ok(bytes) => {
                    debug!(url, bytes = bytes.len(), "fetched font");
                    set.fonts.insert(url.to_string(), bytes);
                }
                Err(e) => {
                    warn!(url, error = %e, "font fetch failed");
                    set.failures.insert(url.to_string(), e.to_string());
                }
            }
        }
        set
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

impl Default for FontFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetched font bytes keyed by source URL, with per-URL failures kept for
/// error reporting.
#[derive(Debug, Default)]
pub struct FontSet {
    fonts: HashMap<String, Vec<u8>>,
    failures: HashMap<String, String>,
}

impl FontSet {
    /// Build a set from already-loaded fonts.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, Vec<u8>)>) -> Self {
        Self {
            fonts: pairs.into_iter().collect(),
            failures: HashMap::new(),
        }
    }

    /// Bytes for a URL, or the failure recorded when fetching it.
    pub fn get(&self, url: &str) -> Result<&[u8], OgError> {
        if let Some(bytes) = self.fonts.get(url) {
            return Ok(bytes.as_slice());
        }
        let reason = self
            .failures
            .get(url)
            .cloned()
            .unwrap_or_else(|| "font was never fetched".to_string());
        Err(OgError::Font {
            url: url.to_string(),
            reason,
        })
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Write every fetched font under `dir`, named per [`file_name`].
    pub fn write_to(&self, dir: &Path) -> Result<(), OgError> {
        fs::create_dir_all(dir).map_err(|source| OgError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        for (url, bytes) in &self.fonts {
            let path = dir.join(file_name(url));
            fs::write(&path, bytes).map_err(|source| OgError::Io { path, source })?;
        }
        Ok(())
    }
}

/// Local file name for a font URL: the family segment plus the file,
/// so `.../fonts/anybody/latin-800-normal.ttf` becomes
/// `anybody-latin-800-normal.ttf`.
pub fn file_name(url: &str) -> String {
    let mut segments = url
        .trim_end_matches('/')
        .rsplit('/')
        .filter(|s| !s.is_empty());
    let Some(file) = segments.next() else {
        return "font.ttf".to_string();
    };
    match segments.next() {
        Some(parent) if parent != "fonts" && !parent.contains(':') => format!("{parent}-{file}"),
        _ => file.to_string(),
    }
}
