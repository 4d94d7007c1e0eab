//! Site configuration loaded from environment variables.
//!
//! Built once at startup and passed by reference; the values are the
//! process-wide constants the page-rendering layer reads.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use url::Url;

/// Site-wide configuration constants.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Site title (default: "Joost Schuur").
    pub title: String,

    /// Site description for meta tags.
    pub description: String,

    /// Canonical social handle (default: "@joostschuur").
    pub social_handle: String,

    /// Display name of the site author.
    pub author_name: String,

    /// Analytics measurement id. When None, analytics is disabled.
    pub analytics_id: Option<String>,

    /// How many posts the front page features (default: 4).
    pub featured_post_count: usize,

    /// Canonical origin, derived from the SITE_URL environment variable.
    pub site_url: String,

    /// Blog content directory (default: ./content/blog).
    pub content_dir: PathBuf,

    /// Build output directory (default: ./dist).
    pub output_dir: PathBuf,
}

impl SiteConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Load configuration through an injected variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw_site_url = var("SITE_URL").context("SITE_URL environment variable is required")?;
        let site_url = Url::parse(&raw_site_url)
            .context("SITE_URL must be a well-formed absolute URL")?
            .origin()
            .ascii_serialization();

        let title = var("SITE_TITLE").unwrap_or_else(|| "Joost Schuur".to_string());

        let description = var("SITE_DESCRIPTION").unwrap_or_else(|| {
            "JavaScript, product development, workflow tools, content curation and more."
                .to_string()
        });

        let social_handle = var("SOCIAL_HANDLE").unwrap_or_else(|| "@joostschuur".to_string());

        let author_name = var("AUTHOR_NAME").unwrap_or_else(|| "Joost Schuur".to_string());

        // Setting ANALYTICS_ID to an empty string disables analytics.
        let analytics_id = var("ANALYTICS_ID").unwrap_or_else(|| "G-3GLM22RF0C".to_string());
        let analytics_id = (!analytics_id.is_empty()).then_some(analytics_id);

        let featured_post_count = var("FEATURED_POST_COUNT")
            .unwrap_or_else(|| "4".to_string())
            .parse()
            .context("FEATURED_POST_COUNT must be a valid usize")?;

        let content_dir = var("CONTENT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./content/blog"));

        let output_dir = var("OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./dist"));

        Ok(Self {
            title,
            description,
            social_handle,
            author_name,
            analytics_id,
            featured_post_count,
            site_url,
            content_dir,
            output_dir,
        })
    }
}
