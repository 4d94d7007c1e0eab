//! Vetrina Site
//!
//! Build-time engine for the personal site: configuration constants
//! derived from the environment, blog content sources, and Open Graph
//! preview image generation. The `vetrina` binary drives all of it.

pub mod config;
pub mod content;
pub mod og;

pub use config::SiteConfig;
pub use content::{ContentError, ContentSource, Document, FrontMatter, featured};
pub use og::{
    FontFetcher, FontSet, GenerationFailure, GenerationReport, OgError, OgGenerator, OgImageEntry,
    OgImageOptions, OgManifest,
};
