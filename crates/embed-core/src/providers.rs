//! The standard set of media-hosting services
//!
//! Registered in this order by [`standard_providers`]: YouTube, Slideshare,
//! Flickr, Vimeo, Facebook videos. Every provider can be pointed at a
//! different endpoint with `with_endpoint`, which is how tests and proxies
//! redirect traffic.

use crate::config::EmbedConfig;
use crate::error::{EmbedError, Result};
use crate::html;
use crate::markup::{Markup, OEmbedType};
use crate::provider::{fetch_metadata, normalize, Provider};
use crate::url_parts::UrlParts;
use async_trait::async_trait;
use networking::HttpGet;
use std::sync::Arc;
use tracing::debug;

/// YouTube oEmbed endpoint
pub const YOUTUBE_ENDPOINT: &str = "https://www.youtube.com/oembed";
/// Slideshare oEmbed endpoint
pub const SLIDESHARE_ENDPOINT: &str = "https://de.slideshare.net/api/oembed/2";
/// Flickr oEmbed endpoint
pub const FLICKR_ENDPOINT: &str = "https://www.flickr.com/services/oembed";
/// Vimeo oEmbed endpoint
pub const VIMEO_ENDPOINT: &str = "https://vimeo.com/api/oembed.json";
/// Facebook video oEmbed endpoint
pub const FACEBOOK_VIDEOS_ENDPOINT: &str = "https://www.facebook.com/plugins/video/oembed.json/";

/// Names of the standard providers in registration order
pub const STANDARD_PROVIDER_NAMES: [&str; 5] =
    ["youtube", "slideshare", "flickr", "vimeo", "facebookvideos"];

/// All standard providers in registration order
pub fn standard_providers() -> Vec<Arc<dyn Provider>> {
    STANDARD_PROVIDER_NAMES
        .iter()
        .filter_map(|name| standard_provider(name))
        .collect()
}

/// Look up a standard provider by name (case-insensitive)
pub fn standard_provider(name: &str) -> Option<Arc<dyn Provider>> {
    let provider: Arc<dyn Provider> = match name.to_lowercase().as_str() {
        "youtube" => Arc::new(YouTube::new()),
        "slideshare" => Arc::new(Slideshare::new()),
        "flickr" => Arc::new(Flickr::new()),
        "vimeo" => Arc::new(Vimeo::new()),
        "facebookvideos" => Arc::new(FacebookVideos::new()),
        _ => return None,
    };
    Some(provider)
}

// =============================================================================
// YouTube
// =============================================================================

/// YouTube videos
///
/// The endpoint ignores an `autoplay` request parameter, so when autoplay is
/// requested the returned iframe `src` is rewritten instead.
#[derive(Debug, Clone)]
pub struct YouTube {
    endpoint: String,
}

impl YouTube {
    /// Create the provider with the public endpoint
    pub fn new() -> Self {
        Self::with_endpoint(YOUTUBE_ENDPOINT)
    }

    /// Create the provider with a custom endpoint
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Default for YouTube {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for YouTube {
    fn name(&self) -> &str {
        "youtube"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn test(&self, parts: &UrlParts) -> bool {
        parts.host_contains_any(&["youtube.com", "youtu.be"])
    }

    async fn fetch_and_normalize(
        &self,
        parts: &UrlParts,
        config: &EmbedConfig,
        http: &dyn HttpGet,
    ) -> Result<Markup> {
        let metadata = fetch_metadata(self, parts, config, http).await?;
        let markup = normalize(self.name(), metadata)?;

        if !config.autoplay {
            return Ok(markup);
        }

        match html::inject_autoplay(markup.text()) {
            Some(rewritten) => Ok(markup.with_html(rewritten)),
            None => {
                debug!("no iframe src to rewrite for autoplay");
                Ok(markup)
            }
        }
    }
}

// =============================================================================
// Slideshare
// =============================================================================

/// Slideshare presentations
#[derive(Debug, Clone)]
pub struct Slideshare {
    endpoint: String,
}

impl Slideshare {
    /// Create the provider with the public endpoint
    pub fn new() -> Self {
        Self::with_endpoint(SLIDESHARE_ENDPOINT)
    }

    /// Create the provider with a custom endpoint
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Default for Slideshare {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for Slideshare {
    fn name(&self) -> &str {
        "slideshare"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn test(&self, parts: &UrlParts) -> bool {
        parts.host_contains_any(&["slideshare.net", "slideshare.com"])
    }
}

// =============================================================================
// Flickr
// =============================================================================

/// Flickr photos
///
/// Flickr's `html` fragment is an iframe. It is ignored in favor of a plain
/// linked image that credits the photo page.
#[derive(Debug, Clone)]
pub struct Flickr {
    endpoint: String,
}

impl Flickr {
    /// Create the provider with the public endpoint
    pub fn new() -> Self {
        Self::with_endpoint(FLICKR_ENDPOINT)
    }

    /// Create the provider with a custom endpoint
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Default for Flickr {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for Flickr {
    fn name(&self) -> &str {
        "flickr"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn test(&self, parts: &UrlParts) -> bool {
        parts.host_contains_any(&["flickr.com"])
    }

    async fn fetch_and_normalize(
        &self,
        parts: &UrlParts,
        config: &EmbedConfig,
        http: &dyn HttpGet,
    ) -> Result<Markup> {
        let metadata = fetch_metadata(self, parts, config, http).await?;

        if metadata.kind() != Some(OEmbedType::Photo) {
            return Err(EmbedError::schema(
                self.name(),
                format!("expected photo, got {:?}", metadata.type_name()),
            ));
        }

        let (page, src, width, height) = match (
            metadata.get_text("web_page"),
            metadata.url(),
            metadata.get_text("width"),
            metadata.get_text("height"),
        ) {
            (Some(page), Some(src), Some(width), Some(height)) => (page, src, width, height),
            _ => {
                return Err(EmbedError::schema(
                    self.name(),
                    "photo without web_page/url/width/height",
                ))
            }
        };
        let title = metadata.title().unwrap_or_default();

        let html = format!(
            r#"<a target="flickr" href="{}"><img src="{}" class="flickr-embed-img" alt="{}" width="{}" height="{}"></a>"#,
            html::escape(&page),
            html::escape(src),
            html::escape(title),
            html::escape(&width),
            html::escape(&height),
        );
        Ok(Markup::new(html, metadata))
    }
}

// =============================================================================
// Vimeo
// =============================================================================

/// Vimeo videos
#[derive(Debug, Clone)]
pub struct Vimeo {
    endpoint: String,
}

impl Vimeo {
    /// Create the provider with the public endpoint
    pub fn new() -> Self {
        Self::with_endpoint(VIMEO_ENDPOINT)
    }

    /// Create the provider with a custom endpoint
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Default for Vimeo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for Vimeo {
    fn name(&self) -> &str {
        "vimeo"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn test(&self, parts: &UrlParts) -> bool {
        parts.host_contains_any(&["vimeo.com"])
    }
}

// =============================================================================
// Facebook videos
// =============================================================================

/// Facebook videos
///
/// Only video paths match: `/{page}/videos/...` and `/video.php`.
#[derive(Debug, Clone)]
pub struct FacebookVideos {
    endpoint: String,
}

impl FacebookVideos {
    /// Create the provider with the public endpoint
    pub fn new() -> Self {
        Self::with_endpoint(FACEBOOK_VIDEOS_ENDPOINT)
    }

    /// Create the provider with a custom endpoint
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Default for FacebookVideos {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for FacebookVideos {
    fn name(&self) -> &str {
        "facebookvideos"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn test(&self, parts: &UrlParts) -> bool {
        if !parts.host_contains_any(&["facebook.com"]) {
            return false;
        }

        let segments = parts.path_segments();
        segments.get(2) == Some(&"videos") || segments.get(1) == Some(&"video.php")
    }
}
