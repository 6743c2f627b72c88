//! HTTP GET capability and its reqwest implementation
//!
//! Providers only ever issue a single GET with query parameters against a
//! fixed endpoint, so the capability is deliberately narrow: endpoint plus
//! parameters in, status plus body out.

use crate::{NetworkError, Result};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Ordered query parameters for a GET request
pub type QueryParams = Vec<(String, String)>;

/// Raw HTTP response as seen by providers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body decoded as text
    pub body: String,
}

impl HttpResponse {
    /// Create a new response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Check if the response is successful (2xx status)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound HTTP GET capability
///
/// Implementations must be reentrant: the embedder may be shared across tasks
/// and each of them can issue requests through the same value.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpGet: Send + Sync {
    /// Issue a GET to `endpoint` with the given query parameters
    async fn get(&self, endpoint: &str, params: &[(String, String)]) -> Result<HttpResponse>;
}

#[async_trait]
impl<T: HttpGet + ?Sized> HttpGet for Arc<T> {
    async fn get(&self, endpoint: &str, params: &[(String, String)]) -> Result<HttpResponse> {
        (**self).get(endpoint, params).await
    }
}

/// Configuration for the reqwest-backed client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Custom headers to include in all requests
    pub default_headers: HashMap<String, String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: format!("embeddify/{}", env!("CARGO_PKG_VERSION")),
            default_headers: HashMap::new(),
        }
    }
}

impl HttpClientConfig {
    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a default header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }
}

/// HTTP client backed by reqwest
///
/// # Examples
/// ```no_run
/// use networking::{HttpClient, HttpClientConfig, HttpGet};
///
/// async fn example() -> Result<(), Box<dyn std::error::Error>> {
///     let client = HttpClient::new(HttpClientConfig::default())?;
///     let params = vec![("format".to_string(), "json".to_string())];
///     let response = client.get("https://vimeo.com/api/oembed.json", &params).await?;
///     println!("status: {}", response.status);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new client
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NetworkError::ClientBuild(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Get the configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

#[async_trait]
impl HttpGet for HttpClient {
    async fn get(&self, endpoint: &str, params: &[(String, String)]) -> Result<HttpResponse> {
        let mut req = self.client.get(endpoint).query(params);

        for (key, value) in &self.config.default_headers {
            req = req.header(key, value);
        }

        let response = req.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;

        debug!(endpoint, status, bytes = body.len(), "GET completed");
        Ok(HttpResponse { status, body })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> NetworkError {
    if err.is_timeout() {
        NetworkError::Timeout
    } else {
        NetworkError::Transport(err.to_string())
    }
}
