//! Test fixtures shared by the unit tests
//!
//! `MockHttp` covers expectation-style tests. `ScriptedHttp` serves canned
//! responses per endpoint, can hang forever to exercise timeouts, and records
//! the order in which endpoints were hit.

use crate::url_parts::UrlParts;
use async_trait::async_trait;
use mockall::mock;
use networking::{HttpGet, HttpResponse, NetworkError, Result as NetResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

mock! {
    pub Http {}

    #[async_trait]
    impl HttpGet for Http {
        async fn get(&self, endpoint: &str, params: &[(String, String)]) -> NetResult<HttpResponse>;
    }
}

/// Parse a URL that is known to be valid
pub fn parts(url: &str) -> UrlParts {
    UrlParts::parse(url).unwrap()
}

/// A 200 response carrying the given JSON
pub fn json_ok(value: Value) -> NetResult<HttpResponse> {
    Ok(HttpResponse::new(200, value.to_string()))
}

/// Look up a query parameter by key
pub fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Endpoint comparison usable from `withf` predicates
pub fn is_endpoint(endpoint: &str, expected: &str) -> bool {
    endpoint == expected
}

/// Canned behavior for one endpoint
#[derive(Debug, Clone)]
pub enum Route {
    /// Respond with a status and body
    Respond(u16, String),
    /// Fail at the transport level
    Fail,
    /// Never complete
    Hang,
}

/// HTTP stub keyed by endpoint
#[derive(Debug, Default)]
pub struct ScriptedHttp {
    routes: HashMap<String, Route>,
    calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl ScriptedHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, endpoint: &str, route: Route) -> Self {
        self.routes.insert(endpoint.to_string(), route);
        self
    }

    pub fn json(self, endpoint: &str, value: Value) -> Self {
        self.route(endpoint, Route::Respond(200, value.to_string()))
    }

    pub fn status(self, endpoint: &str, status: u16) -> Self {
        self.route(endpoint, Route::Respond(status, String::new()))
    }

    /// Endpoints hit so far, in order
    pub fn endpoints(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(endpoint, _)| endpoint.clone())
            .collect()
    }

    /// Query parameters of the most recent call to `endpoint`
    pub fn last_params(&self, endpoint: &str) -> Option<Vec<(String, String)>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(e, _)| e == endpoint)
            .map(|(_, params)| params.clone())
    }
}

#[async_trait]
impl HttpGet for ScriptedHttp {
    async fn get(&self, endpoint: &str, params: &[(String, String)]) -> NetResult<HttpResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), params.to_vec()));

        match self.routes.get(endpoint) {
            Some(Route::Respond(status, body)) => Ok(HttpResponse::new(*status, body.clone())),
            Some(Route::Fail) => Err(NetworkError::Transport("connection refused".to_string())),
            Some(Route::Hang) => std::future::pending().await,
            None => Ok(HttpResponse::new(404, "no route")),
        }
    }
}
