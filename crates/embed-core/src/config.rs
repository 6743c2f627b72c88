//! Layered embed configuration
//!
//! Four layers feed every provider attempt, lowest precedence first:
//!
//! 1. built-in defaults (`width: 560`, `height: 315`)
//! 2. engine-wide configuration
//! 3. provider-specific configuration, keyed by provider name
//! 4. per-call overrides
//!
//! Merging is a shallow key overwrite. A key set in a higher layer replaces
//! the lower value outright, including the whole `params` map.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Duration;

/// Default maximum embed width in pixels
pub const DEFAULT_WIDTH: u32 = 560;

/// Default maximum embed height in pixels (16:9 with the default width)
pub const DEFAULT_HEIGHT: u32 = 315;

/// Default bound on a single provider attempt
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// One configuration layer; unset keys are inherited from below
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    /// Maximum width, sent as `maxwidth`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Maximum height, sent as `maxheight`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Request autoplaying players
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<bool>,
    /// Extra raw request parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, String>>,
}

impl ConfigLayer {
    /// Create an empty layer
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in bottom layer
    pub fn defaults() -> Self {
        Self {
            width: Some(DEFAULT_WIDTH),
            height: Some(DEFAULT_HEIGHT),
            ..Self::default()
        }
    }

    /// Set the width
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the height
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Set the autoplay flag
    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = Some(autoplay);
        self
    }

    /// Replace the extra request parameters
    pub fn with_params(mut self, params: BTreeMap<String, String>) -> Self {
        self.params = Some(params);
        self
    }

    /// Add one extra request parameter to this layer
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Check if no key is set
    pub fn is_empty(&self) -> bool {
        self.width.is_none()
            && self.height.is_none()
            && self.autoplay.is_none()
            && self.params.is_none()
    }

    /// Overlay `higher` on top of this layer, returning a new layer
    pub fn merged_with(&self, higher: &ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            width: higher.width.or(self.width),
            height: higher.height.or(self.height),
            autoplay: higher.autoplay.or(self.autoplay),
            params: higher.params.clone().or_else(|| self.params.clone()),
        }
    }
}

/// Merge layers given lowest precedence first
pub fn merge<'a>(layers: impl IntoIterator<Item = &'a ConfigLayer>) -> ConfigLayer {
    layers
        .into_iter()
        .fold(ConfigLayer::new(), |acc, layer| acc.merged_with(layer))
}

/// Fully resolved options for one provider attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedConfig {
    /// Maximum width in pixels
    pub width: u32,
    /// Maximum height in pixels
    pub height: u32,
    /// Whether autoplay was requested
    pub autoplay: bool,
    /// Extra raw request parameters
    pub params: BTreeMap<String, String>,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self::from_layer(&ConfigLayer::new())
    }
}

impl EmbedConfig {
    /// Resolve a merged layer, falling back to the built-in defaults
    pub fn from_layer(layer: &ConfigLayer) -> Self {
        Self {
            width: layer.width.unwrap_or(DEFAULT_WIDTH),
            height: layer.height.unwrap_or(DEFAULT_HEIGHT),
            autoplay: layer.autoplay.unwrap_or(false),
            params: layer.params.clone().unwrap_or_default(),
        }
    }
}

/// Serializable engine settings
///
/// ```json
/// {
///   "config": { "width": 400 },
///   "providers": { "youtube": { "width": 200, "autoplay": true } },
///   "enabled": ["youtube", "vimeo"],
///   "timeoutSecs": 5
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbedderSettings {
    /// Engine-wide layer
    pub config: ConfigLayer,
    /// Provider-specific layers keyed by lowercase provider name
    pub providers: HashMap<String, ConfigLayer>,
    /// Standard providers to register, in order; all of them when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<Vec<String>>,
    /// Per-provider attempt timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl EmbedderSettings {
    /// Parse settings from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Attempt timeout, defaulting to [`DEFAULT_TIMEOUT`]
    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }
}
