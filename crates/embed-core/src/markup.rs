//! Embed results and the oEmbed metadata they carry
//!
//! [`Resolution`] is what callers get back from the embedder. It behaves like
//! a string (display, comparison, substring search, concatenation) but keeps
//! the provider's raw response around for anyone who needs thumbnails, titles,
//! or native dimensions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::ops::{Add, Deref};

/// oEmbed resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OEmbedType {
    /// Static image
    Photo,
    /// Playable video with an HTML player
    Video,
    /// Plain link without embeddable content
    Link,
    /// Arbitrary HTML widget
    Rich,
}

impl OEmbedType {
    /// Parse the `type` discriminator
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "photo" => Some(OEmbedType::Photo),
            "video" => Some(OEmbedType::Video),
            "link" => Some(OEmbedType::Link),
            "rich" => Some(OEmbedType::Rich),
            _ => None,
        }
    }

    /// Get the type as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            OEmbedType::Photo => "photo",
            OEmbedType::Video => "video",
            OEmbedType::Link => "link",
            OEmbedType::Rich => "rich",
        }
    }
}

/// Raw oEmbed response body
///
/// The schema belongs to each hosting service. Accessors cover the fields the
/// engine reads; everything else stays reachable through [`Self::get`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteMetadata(Map<String, Value>);

impl RemoteMetadata {
    /// Parse a response body, which must be a JSON object
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Wrap an already parsed object
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Raw field access
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String field access
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Field rendered as attribute text; strings verbatim, numbers formatted
    pub fn get_text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Field read as pixel dimension; accepts numbers and numeric strings
    fn get_dimension(&self, key: &str) -> Option<u32> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// The raw `type` value
    pub fn type_name(&self) -> Option<&str> {
        self.get_str("type")
    }

    /// The parsed `type` discriminator
    pub fn kind(&self) -> Option<OEmbedType> {
        self.type_name().and_then(OEmbedType::parse)
    }

    /// Embed HTML fragment
    pub fn html(&self) -> Option<&str> {
        self.get_str("html")
    }

    /// Resource URL (the image for photos)
    pub fn url(&self) -> Option<&str> {
        self.get_str("url")
    }

    /// Resource title
    pub fn title(&self) -> Option<&str> {
        self.get_str("title")
    }

    /// Author name
    pub fn author_name(&self) -> Option<&str> {
        self.get_str("author_name")
    }

    /// Provider name as reported by the service
    pub fn provider_name(&self) -> Option<&str> {
        self.get_str("provider_name")
    }

    /// Thumbnail image URL
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.get_str("thumbnail_url")
    }

    /// Native or scaled width
    pub fn width(&self) -> Option<u32> {
        self.get_dimension("width")
    }

    /// Native or scaled height
    pub fn height(&self) -> Option<u32> {
        self.get_dimension("height")
    }

    /// The underlying JSON object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Embed HTML plus the metadata it was derived from
#[derive(Debug, Clone, PartialEq)]
pub struct Markup {
    html: String,
    metadata: RemoteMetadata,
}

impl Markup {
    /// Create a new markup value
    pub fn new(html: impl Into<String>, metadata: RemoteMetadata) -> Self {
        Self {
            html: html.into(),
            metadata,
        }
    }

    /// The embed HTML
    pub fn text(&self) -> &str {
        &self.html
    }

    /// The provider response
    pub fn metadata(&self) -> &RemoteMetadata {
        &self.metadata
    }

    /// Replace the HTML, keeping the metadata
    pub fn with_html(self, html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            metadata: self.metadata,
        }
    }

    /// Split into HTML and metadata
    pub fn into_parts(self) -> (String, RemoteMetadata) {
        (self.html, self.metadata)
    }
}

/// Outcome of resolving one URL
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A provider produced embed markup
    Markup(Markup),
    /// No provider produced markup; the original input, unchanged
    Passthrough(String),
}

impl Resolution {
    /// The text to render: embed HTML or the untouched input
    pub fn text(&self) -> &str {
        match self {
            Resolution::Markup(markup) => markup.text(),
            Resolution::Passthrough(original) => original,
        }
    }

    /// Provider metadata, only present for markup
    pub fn metadata(&self) -> Option<&RemoteMetadata> {
        self.as_markup().map(Markup::metadata)
    }

    /// Check if a provider produced markup
    pub fn is_markup(&self) -> bool {
        matches!(self, Resolution::Markup(_))
    }

    /// Check if the input was passed through
    pub fn is_passthrough(&self) -> bool {
        matches!(self, Resolution::Passthrough(_))
    }

    /// Get as markup if applicable
    pub fn as_markup(&self) -> Option<&Markup> {
        match self {
            Resolution::Markup(markup) => Some(markup),
            Resolution::Passthrough(_) => None,
        }
    }

    /// Consume into the rendered text
    pub fn into_text(self) -> String {
        match self {
            Resolution::Markup(markup) => markup.html,
            Resolution::Passthrough(original) => original,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl Deref for Resolution {
    type Target = str;

    fn deref(&self) -> &str {
        self.text()
    }
}

impl AsRef<str> for Resolution {
    fn as_ref(&self) -> &str {
        self.text()
    }
}

impl PartialEq<str> for Resolution {
    fn eq(&self, other: &str) -> bool {
        self.text() == other
    }
}

impl PartialEq<&str> for Resolution {
    fn eq(&self, other: &&str) -> bool {
        self.text() == *other
    }
}

impl PartialEq<String> for Resolution {
    fn eq(&self, other: &String) -> bool {
        self.text() == other
    }
}

impl Add<&str> for Resolution {
    type Output = String;

    fn add(self, rhs: &str) -> String {
        self.into_text() + rhs
    }
}

impl From<Resolution> for String {
    fn from(resolution: Resolution) -> Self {
        resolution.into_text()
    }
}
