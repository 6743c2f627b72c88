//! Command-line front end: resolve links to embed codes and print them

use anyhow::{Context, Result};
use clap::Parser;
use embeddify::{
    ConfigLayer, Embedder, EmbedderSettings, HttpClient, HttpClientConfig, RetryConfig,
    RetryingClient,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Convert media links into embed codes
#[derive(Debug, Parser)]
#[command(name = "embeddify", version, about)]
struct Cli {
    /// Links to resolve
    #[arg(required = true)]
    urls: Vec<String>,

    /// Maximum embed width
    #[arg(long)]
    width: Option<u32>,

    /// Maximum embed height
    #[arg(long)]
    height: Option<u32>,

    /// Request autoplaying players
    #[arg(long)]
    autoplay: bool,

    /// Settings file (JSON)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Per-provider timeout in seconds, overriding the settings file
    #[arg(long)]
    timeout: Option<u64>,

    /// Retries for transient network failures
    #[arg(long, default_value_t = 0)]
    retries: usize,

    /// Print provider metadata as JSON after each embed
    #[arg(long)]
    metadata: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::new();
        layer.width = self.width;
        layer.height = self.height;
        if self.autoplay {
            layer.autoplay = Some(true);
        }
        layer
    }
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => EmbedderSettings::from_path(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => EmbedderSettings::default(),
    };
    if let Some(timeout) = cli.timeout {
        settings.timeout_secs = Some(timeout);
    }

    let client_config = HttpClientConfig::default().with_timeout(settings.timeout());
    let client = HttpClient::new(client_config).context("building HTTP client")?;
    let retry = RetryConfig::new(cli.retries).with_initial_delay(Duration::from_millis(250));
    let http = Arc::new(RetryingClient::new(client, retry));

    let embedder = Embedder::from_settings(&settings, http).context("configuring providers")?;
    tracing::debug!(providers = ?embedder.provider_names(), "embedder ready");

    let overrides = cli.overrides();
    for url in &cli.urls {
        let result = embedder.resolve(url, &overrides).await;
        println!("{}", result);

        if cli.metadata {
            if let Some(metadata) = result.metadata() {
                println!("{}", serde_json::to_string_pretty(metadata)?);
            }
        }
    }

    Ok(())
}
