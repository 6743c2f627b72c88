//! The dispatch engine
//!
//! An [`Embedder`] owns an ordered provider registry and the HTTP capability.
//! Resolving a URL walks the registry in order and returns the first markup
//! any provider produces. Mismatches, remote failures, timeouts, and
//! unrecognized responses all mean "try the next one"; when the registry is
//! exhausted the input comes back untouched.

use crate::config::{ConfigLayer, EmbedConfig, EmbedderSettings, DEFAULT_TIMEOUT};
use crate::error::{ConfigError, EmbedError, RemoteFailure};
use crate::markup::Resolution;
use crate::provider::Provider;
use crate::providers::{standard_provider, standard_providers};
use crate::url_parts::UrlParts;
use networking::HttpGet;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// A provider together with its precomputed base configuration
struct Registered {
    provider: Arc<dyn Provider>,
    /// merge(default, engine-wide, provider-specific)
    base: ConfigLayer,
}

/// Converts media links into embed markup
///
/// Immutable after construction, so one instance can serve concurrent
/// callers.
///
/// # Examples
/// ```no_run
/// use embed_core::{ConfigLayer, Embedder};
/// use networking::{HttpClient, HttpClientConfig};
/// use std::sync::Arc;
///
/// async fn example() -> Result<(), Box<dyn std::error::Error>> {
///     let http = Arc::new(HttpClient::new(HttpClientConfig::default())?);
///     let embedder = Embedder::builder()
///         .config(ConfigLayer::new().with_width(400))
///         .provider_config("youtube", ConfigLayer::new().with_autoplay(true))
///         .build(http);
///
///     let result = embedder.resolve_default("https://vimeo.com/6791752").await;
///     if let Some(metadata) = result.metadata() {
///         println!("{:?}", metadata.thumbnail_url());
///     }
///     println!("{}", result);
///     Ok(())
/// }
/// ```
pub struct Embedder {
    providers: Vec<Registered>,
    http: Arc<dyn HttpGet>,
    timeout: Duration,
}

impl Embedder {
    /// Create an engine from its parts
    ///
    /// `provider_config` is keyed by provider name, case-insensitively.
    pub fn new(
        providers: Vec<Arc<dyn Provider>>,
        config: ConfigLayer,
        provider_config: HashMap<String, ConfigLayer>,
        http: Arc<dyn HttpGet>,
    ) -> Self {
        let provider_config: HashMap<String, ConfigLayer> = provider_config
            .into_iter()
            .map(|(name, layer)| (name.to_lowercase(), layer))
            .collect();
        let engine_base = ConfigLayer::defaults().merged_with(&config);

        let providers = providers
            .into_iter()
            .map(|provider| {
                let base = match provider_config.get(&provider.name().to_lowercase()) {
                    Some(layer) => engine_base.merged_with(layer),
                    None => engine_base.clone(),
                };
                Registered { provider, base }
            })
            .collect();

        Self {
            providers,
            http,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Start building an engine
    pub fn builder() -> EmbedderBuilder {
        EmbedderBuilder::default()
    }

    /// Engine over the standard providers with default configuration
    pub fn standard(http: Arc<dyn HttpGet>) -> Self {
        Self::builder().build(http)
    }

    /// Engine described by a settings document
    pub fn from_settings(
        settings: &EmbedderSettings,
        http: Arc<dyn HttpGet>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Self::builder()
            .config(settings.config.clone())
            .timeout(settings.timeout());

        if let Some(enabled) = &settings.enabled {
            let providers = enabled
                .iter()
                .map(|name| {
                    standard_provider(name).ok_or_else(|| ConfigError::UnknownProvider(name.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            builder = builder.providers(providers);
        }

        for (name, layer) in &settings.providers {
            builder = builder.provider_config(name.clone(), layer.clone());
        }

        Ok(builder.build(http))
    }

    /// Provider names in registration order
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers
            .iter()
            .map(|entry| entry.provider.name())
            .collect()
    }

    /// The stored base configuration of a provider
    pub fn provider_config(&self, name: &str) -> Option<&ConfigLayer> {
        let name = name.to_lowercase();
        self.providers
            .iter()
            .find(|entry| entry.provider.name() == name)
            .map(|entry| &entry.base)
    }

    /// Bound on each provider attempt
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve with no per-call overrides
    pub async fn resolve_default(&self, url: &str) -> Resolution {
        self.resolve(url, &ConfigLayer::new()).await
    }

    /// Turn `url` into embed markup, or hand it back unchanged
    ///
    /// Providers are tried strictly in registration order, one at a time.
    /// Never fails: every provider error is logged and skipped.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn resolve(&self, url: &str, overrides: &ConfigLayer) -> Resolution {
        let parts = match UrlParts::parse(url) {
            Ok(parts) => parts,
            Err(err) => {
                debug!(error = %err, "not an absolute URL, passing through");
                return Resolution::Passthrough(url.to_string());
            }
        };

        for entry in &self.providers {
            let name = entry.provider.name();
            let config = EmbedConfig::from_layer(&entry.base.merged_with(overrides));

            let attempt = entry
                .provider
                .fetch_and_normalize(&parts, &config, self.http.as_ref());
            let result = match tokio::time::timeout(self.timeout, attempt).await {
                Ok(result) => result,
                Err(_) => Err(EmbedError::remote(name, RemoteFailure::Timeout(self.timeout))),
            };

            match result {
                Ok(markup) => {
                    info!(provider = name, "resolved embed");
                    return Resolution::Markup(markup);
                }
                Err(err) if err.is_mismatch() => {}
                Err(err) => warn!(provider = name, error = %err, "provider failed, trying next"),
            }
        }

        debug!("no provider produced markup, passing through");
        Resolution::Passthrough(url.to_string())
    }
}

impl fmt::Debug for Embedder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Embedder")
            .field("providers", &self.provider_names())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builder for [`Embedder`]
#[derive(Default)]
pub struct EmbedderBuilder {
    providers: Option<Vec<Arc<dyn Provider>>>,
    config: ConfigLayer,
    provider_config: HashMap<String, ConfigLayer>,
    timeout: Option<Duration>,
}

impl EmbedderBuilder {
    /// Append a provider; the standard set is used if none is added
    pub fn provider(mut self, provider: impl Provider + 'static) -> Self {
        self.providers
            .get_or_insert_with(Vec::new)
            .push(Arc::new(provider));
        self
    }

    /// Replace the provider list
    pub fn providers(mut self, providers: Vec<Arc<dyn Provider>>) -> Self {
        self.providers = Some(providers);
        self
    }

    /// Set the engine-wide configuration layer
    pub fn config(mut self, config: ConfigLayer) -> Self {
        self.config = config;
        self
    }

    /// Set the configuration layer for one provider
    pub fn provider_config(mut self, name: impl Into<String>, config: ConfigLayer) -> Self {
        self.provider_config.insert(name.into(), config);
        self
    }

    /// Set the bound on each provider attempt
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the engine
    pub fn build(self, http: Arc<dyn HttpGet>) -> Embedder {
        let providers = self.providers.unwrap_or_else(standard_providers);
        let mut embedder = Embedder::new(providers, self.config, self.provider_config, http);
        if let Some(timeout) = self.timeout {
            embedder.timeout = timeout;
        }
        embedder
    }
}
