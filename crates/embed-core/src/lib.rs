//! Core embedding logic for embeddify
//!
//! This crate turns links to known media-hosting services into embed markup
//! by querying each service's oEmbed endpoint. It contains the provider
//! registry, the layered configuration, the value types for results, and
//! the dispatch engine that ties them together.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod embedder;
pub mod error;
pub mod html;
pub mod markup;
pub mod provider;
pub mod providers;
pub mod url_parts;

#[cfg(test)]
mod testing;

pub use config::{ConfigLayer, EmbedConfig, EmbedderSettings};
pub use embedder::{Embedder, EmbedderBuilder};
pub use error::{ConfigError, EmbedError, RemoteFailure};
pub use markup::{Markup, OEmbedType, RemoteMetadata, Resolution};
pub use provider::{OEmbedProvider, Provider};
pub use providers::{
    standard_provider, standard_providers, FacebookVideos, Flickr, Slideshare, Vimeo, YouTube,
};
pub use url_parts::UrlParts;
