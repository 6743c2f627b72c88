//! Networking utilities for embeddify
//!
//! This crate provides the outbound HTTP GET capability used by oEmbed
//! providers, a reqwest-backed implementation with timeout handling, and an
//! opt-in retry wrapper.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod retry;

pub use client::{HttpClient, HttpClientConfig, HttpGet, HttpResponse, QueryParams};
pub use retry::{retry, RetryConfig, RetryingClient};

use thiserror::Error;

/// Errors raised by the HTTP transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// Connection, TLS, or body read failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request did not complete in time
    #[error("Request timeout")]
    Timeout,

    /// A response arrived with a status that was given up on after retrying
    #[error("Unexpected status: {0}")]
    Status(u16),

    /// The underlying client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl NetworkError {
    /// Check if this error is worth retrying
    pub fn is_recoverable(&self) -> bool {
        match self {
            NetworkError::Transport(_) | NetworkError::Timeout => true,
            NetworkError::Status(status) => is_recoverable_status(*status),
            NetworkError::ClientBuild(_) => false,
        }
    }
}

/// Statuses that indicate a transient upstream condition
///
/// Network failure statuses: 408, 425, 429, 500, 502, 503, 504, 522, 524
pub fn is_recoverable_status(status: u16) -> bool {
    matches!(status, 408 | 425 | 429 | 500 | 502 | 503 | 504 | 522 | 524)
}

/// Result type for networking operations
pub type Result<T> = std::result::Result<T, NetworkError>;
