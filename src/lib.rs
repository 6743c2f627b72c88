//! embeddify: convert media links into embed codes
//!
//! A thin facade over [`embed_core`] and [`networking`] that wires the
//! standard providers to a reqwest-backed HTTP client.
//!
//! ```no_run
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let embedder = embeddify::default_embedder()?;
//!     let html = embedder
//!         .resolve_default("https://www.youtube.com/watch?v=2wii8hfNkzE")
//!         .await;
//!     println!("{}", html);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use embed_core::*;
pub use networking::{
    HttpClient, HttpClientConfig, HttpGet, HttpResponse, NetworkError, RetryConfig, RetryingClient,
};

use std::sync::Arc;

/// Engine over the standard providers using a default HTTP client
pub fn default_embedder() -> Result<Embedder, NetworkError> {
    let client = HttpClient::new(HttpClientConfig::default())?;
    Ok(Embedder::standard(Arc::new(client)))
}
