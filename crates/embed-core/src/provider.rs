//! The provider capability and the generic oEmbed algorithm
//!
//! A provider answers two questions: does this URL belong to my service
//! ([`Provider::test`]), and what embed markup does my oEmbed endpoint
//! describe for it ([`Provider::fetch_and_normalize`]). Most services are
//! fully served by the default implementation; the ones with quirks override
//! `fetch_and_normalize` and reuse [`fetch_metadata`] and [`normalize`].

use crate::config::EmbedConfig;
use crate::error::{EmbedError, RemoteFailure, Result};
use crate::html;
use crate::markup::{Markup, OEmbedType, RemoteMetadata};
use crate::url_parts::UrlParts;
use async_trait::async_trait;
use networking::{HttpGet, QueryParams};
use tracing::debug;

/// One media-hosting service
#[async_trait]
pub trait Provider: Send + Sync {
    /// Identity used for per-provider configuration (lowercase)
    fn name(&self) -> &str;

    /// The oEmbed endpoint queried for this service
    fn endpoint(&self) -> &str;

    /// Structural match; never touches the network
    fn test(&self, parts: &UrlParts) -> bool;

    /// Query the endpoint and turn the response into markup
    async fn fetch_and_normalize(
        &self,
        parts: &UrlParts,
        config: &EmbedConfig,
        http: &dyn HttpGet,
    ) -> Result<Markup> {
        let metadata = fetch_metadata(self, parts, config, http).await?;
        normalize(self.name(), metadata)
    }
}

/// Build the oEmbed query for a URL
///
/// `maxwidth`, `maxheight`, `format`, `url`, and `autoplay` (when requested)
/// are set first; `params` entries fill in only keys not already present.
pub fn build_params(parts: &UrlParts, config: &EmbedConfig) -> QueryParams {
    let mut params: QueryParams = vec![
        ("maxwidth".to_string(), config.width.to_string()),
        ("maxheight".to_string(), config.height.to_string()),
        ("format".to_string(), "json".to_string()),
        ("url".to_string(), parts.as_str().to_string()),
    ];

    if config.autoplay {
        params.push(("autoplay".to_string(), "1".to_string()));
    }

    for (key, value) in &config.params {
        if !params.iter().any(|(existing, _)| existing == key) {
            params.push((key.clone(), value.clone()));
        }
    }

    params
}

/// Run the structural test and, on a match, fetch the raw oEmbed response
pub async fn fetch_metadata<P: Provider + ?Sized>(
    provider: &P,
    parts: &UrlParts,
    config: &EmbedConfig,
    http: &dyn HttpGet,
) -> Result<RemoteMetadata> {
    let name = provider.name();
    if !provider.test(parts) {
        return Err(EmbedError::StructuralMismatch(name.to_string()));
    }

    let params = build_params(parts, config);
    debug!(provider = name, endpoint = provider.endpoint(), "requesting oEmbed");

    let response = http
        .get(provider.endpoint(), &params)
        .await
        .map_err(|e| EmbedError::remote(name, e.into()))?;

    if !response.is_success() {
        return Err(EmbedError::remote(name, RemoteFailure::Status(response.status)));
    }

    RemoteMetadata::from_json(&response.body)
        .map_err(|e| EmbedError::remote(name, RemoteFailure::Body(e.to_string())))
}

/// Generic classification of an oEmbed response
///
/// - `video` / `rich`: the `html` fragment verbatim
/// - `photo`: the `html` fragment if present, else a minimal `<img>` tag
/// - anything else: no markup
pub fn normalize(provider: &str, metadata: RemoteMetadata) -> Result<Markup> {
    match metadata.kind() {
        Some(OEmbedType::Video) | Some(OEmbedType::Rich) => {
            let html = metadata
                .html()
                .ok_or_else(|| EmbedError::schema(provider, "missing html"))?
                .to_string();
            Ok(Markup::new(html, metadata))
        }
        Some(OEmbedType::Photo) => {
            if let Some(html) = metadata.html() {
                let html = html.to_string();
                return Ok(Markup::new(html, metadata));
            }

            let (src, width, height) = match (
                metadata.url(),
                metadata.get_text("width"),
                metadata.get_text("height"),
            ) {
                (Some(src), Some(width), Some(height)) => (src, width, height),
                _ => return Err(EmbedError::schema(provider, "photo without url/width/height")),
            };

            let tag = html::image_tag(src, &width, &height);
            Ok(Markup::new(tag, metadata))
        }
        _ => Err(EmbedError::schema(
            provider,
            format!("unsupported type {:?}", metadata.type_name()),
        )),
    }
}

/// A provider defined entirely by data: name, endpoint, and host fragments
///
/// Covers any service that follows the oEmbed protocol without quirks.
///
/// # Examples
/// ```
/// use embed_core::{OEmbedProvider, Provider, UrlParts};
///
/// let provider = OEmbedProvider::new(
///     "soundcloud",
///     "https://soundcloud.com/oembed",
///     ["soundcloud.com"],
/// );
/// let parts = UrlParts::parse("https://soundcloud.com/artist/track").unwrap();
/// assert!(provider.test(&parts));
/// ```
#[derive(Debug, Clone)]
pub struct OEmbedProvider {
    name: String,
    endpoint: String,
    domains: Vec<String>,
}

impl OEmbedProvider {
    /// Create a new provider
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        domains: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into().to_lowercase(),
            endpoint: endpoint.into(),
            domains: domains.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl Provider for OEmbedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn test(&self, parts: &UrlParts) -> bool {
        self.domains.iter().any(|domain| parts.host().contains(domain.as_str()))
    }
}
