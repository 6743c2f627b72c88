//! Structural decomposition of input URLs

use url::Url;

/// The structural parts of a parsed URL
///
/// Produced once per `resolve` call and shared read-only with every provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts {
    scheme: String,
    host: String,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
    raw: String,
}

impl UrlParts {
    /// Parse an absolute or protocol-relative URL
    ///
    /// Relative paths and free text (`"nourl"`) fail to parse. A
    /// protocol-relative link (`//host/path`) parses with an empty scheme.
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        let input = input.trim();
        let (url, scheme) = if input.starts_with("//") {
            (Url::parse(&format!("https:{}", input))?, String::new())
        } else {
            let url = Url::parse(input)?;
            let scheme = url.scheme().to_string();
            (url, scheme)
        };

        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        };

        Ok(Self {
            scheme,
            host,
            path: url.path().to_string(),
            query: url.query().map(str::to_string),
            fragment: url.fragment().map(str::to_string),
            raw: input.to_string(),
        })
    }

    /// URL scheme (e.g. "https")
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Host including a non-default port, empty if the URL has none
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Path component
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query string without the leading '?'
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Fragment without the leading '#'
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// The URL as given (trimmed), which is what oEmbed endpoints receive
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Check if the host contains any of the given domains
    pub fn host_contains_any(&self, domains: &[&str]) -> bool {
        domains.iter().any(|domain| self.host.contains(domain))
    }

    /// Path split on '/', keeping the leading empty segment
    ///
    /// `/page/videos/123` yields `["", "page", "videos", "123"]`.
    pub fn path_segments(&self) -> Vec<&str> {
        self.path.split('/').collect()
    }
}

impl std::fmt::Display for UrlParts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
