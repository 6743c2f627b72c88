//! Error types for embedding operations
//!
//! None of the provider errors escape [`crate::Embedder::resolve`]: they are
//! logged and the engine moves on to the next provider. They exist so that a
//! single provider attempt can be inspected and tested in isolation.

use networking::NetworkError;
use std::time::Duration;
use thiserror::Error;

/// Why a single provider attempt produced no markup
#[derive(Debug, Error)]
pub enum EmbedError {
    /// The provider's structural test rejected the URL
    #[error("URL not handled by provider {0}")]
    StructuralMismatch(String),

    /// The remote endpoint could not deliver a usable response
    #[error("Remote failure from {provider}: {reason}")]
    RemoteFailure {
        /// Provider identity
        provider: String,
        /// What went wrong
        reason: RemoteFailure,
    },

    /// The response parsed but did not describe anything embeddable
    #[error("Unrecognized response from {provider}: {detail}")]
    UnrecognizedSchema {
        /// Provider identity
        provider: String,
        /// Missing or unexpected field
        detail: String,
    },
}

impl EmbedError {
    pub(crate) fn remote(provider: &str, reason: RemoteFailure) -> Self {
        EmbedError::RemoteFailure {
            provider: provider.to_string(),
            reason,
        }
    }

    pub(crate) fn schema(provider: &str, detail: impl Into<String>) -> Self {
        EmbedError::UnrecognizedSchema {
            provider: provider.to_string(),
            detail: detail.into(),
        }
    }

    /// Check if the provider never attempted a remote call
    pub fn is_mismatch(&self) -> bool {
        matches!(self, EmbedError::StructuralMismatch(_))
    }
}

/// Remote failure details
#[derive(Debug, Error)]
pub enum RemoteFailure {
    /// Non-2xx status
    #[error("status {0}")]
    Status(u16),

    /// Transport error from the HTTP capability
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// The attempt exceeded the engine timeout
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The body was not a JSON object
    #[error("malformed body: {0}")]
    Body(String),
}

/// Errors raised while loading engine settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Settings document could not be read
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    /// Settings document is not valid JSON for the schema
    #[error("Invalid settings: {0}")]
    Json(#[from] serde_json::Error),

    /// An enabled provider name is not part of the standard set
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
}

/// Result type for a single provider attempt
pub type Result<T> = std::result::Result<T, EmbedError>;
