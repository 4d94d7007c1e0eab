//! Open Graph preview images.
//!
//! For every blog document this pipeline produces a descriptor (title and
//! description texts plus the fixed styling), a rendered 1200x630 PNG
//! canvas, and a manifest mapping each route to its files. Fonts named by
//! the descriptors are fetched once per batch and bundled alongside.
//!
//! Failures stay per document: one unreadable post or unreachable font
//! never aborts the rest of the batch.

use std::path::PathBuf;

use thiserror::Error;

pub mod fonts;
pub mod generate;
pub mod options;
pub mod render;

pub use fonts::{FontFetcher, FontSet};
pub use generate::{
    GenerationFailure, GenerationReport, ManifestEntry, OgGenerator, OgManifest, collect_entries,
};
pub use options::{
    Border, BorderSide, FontConfig, FontStyle, FontWeight, Logo, OgImageEntry, OgImageOptions, Rgb,
};
pub use render::{CANVAS_HEIGHT, CANVAS_WIDTH, render_png};

/// Generation errors, scoped to one document unless stated otherwise.
#[derive(Debug, Error)]
pub enum OgError {
    #[error("font {url} unavailable: {reason}")]
    Font { url: String, reason: String },

    #[error("logo {path} failed to load: {reason}")]
    Logo { path: PathBuf, reason: String },

    #[error("render failed: {0}")]
    Render(String),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("descriptor serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
