//! Vetrina site builder
//!
//! Build-time CLI for the personal site: validates the content schema,
//! enumerates blog documents, and generates Open Graph preview images.
//!
//! Usage:
//!   vetrina build    # full build: schema check + preview image bundle
//!   vetrina check    # schema and content validation only
//!   vetrina schema   # print the studio configuration surface as JSON

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use vetrina_site::config::SiteConfig;
use vetrina_site::content::ContentSource;
use vetrina_site::og::{FontFetcher, OgGenerator};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the schema and generate the preview image bundle.
    Build,
    /// Validate the schema and content without writing anything.
    Check,
    /// Print the studio configuration surface as JSON.
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Command::Build => build().await,
        Command::Check => check(),
        Command::Schema => schema(),
    }
}

async fn build() -> Result<()> {
    let config = SiteConfig::from_env().context("failed to load site configuration")?;
    info!(site_url = %config.site_url, "configuration loaded");

    let registry = vetrina_studio::load_registry().context("content schema failed validation")?;
    info!(content_types = registry.len(), "schema registry loaded");

    let source = ContentSource::new(&config.content_dir);
    let generator = OgGenerator::new(&config.output_dir);
    let report = generator
        .run(&source, &FontFetcher::new())
        .await
        .context("preview image generation failed")?;

    println!(
        "{} preview images generated under {} ({} failed)",
        report.generated,
        config.output_dir.join("og").display(),
        report.failed()
    );
    Ok(())
}

fn check() -> Result<()> {
    let config = SiteConfig::from_env().context("failed to load site configuration")?;

    let registry = vetrina_studio::load_registry().context("content schema failed validation")?;
    info!(content_types = registry.len(), "schema registry loaded");

    let source = ContentSource::new(&config.content_dir);
    let mut documents = 0usize;
    let mut invalid = 0usize;
    for result in source.documents() {
        match result {
            Ok(document) => {
                documents += 1;
                info!(route = %document.route, title = %document.front_matter.title, "document ok");
            }
            Err(e) => {
                invalid += 1;
                warn!(error = %e, "invalid document");
            }
        }
    }

    println!(
        "{} content types, {documents} documents ok, {invalid} invalid",
        registry.len()
    );
    if invalid > 0 {
        anyhow::bail!("{invalid} documents failed validation");
    }
    Ok(())
}

fn schema() -> Result<()> {
    let surface =
        vetrina_studio::config_surface().context("failed to serialize studio configuration")?;
    println!(
        "{}",
        serde_json::to_string_pretty(&surface).context("failed to format studio configuration")?
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
