// Transport seam between the gateway and the network.
// The gateway only builds `ApiRequest`s and reads response bodies back.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// HTTP verbs used by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

/// Where a request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Path relative to the REST API base, e.g. `repos/acme/widgets/issues`.
    Rest(String),
    /// The GraphQL endpoint.
    GraphQl,
}

/// A fully described outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub endpoint: Endpoint,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            endpoint: Endpoint::Rest(path.into()),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            endpoint: Endpoint::Rest(path.into()),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Patch,
            endpoint: Endpoint::Rest(path.into()),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn graphql(body: Value) -> Self {
        Self {
            method: Method::Post,
            endpoint: Endpoint::GraphQl,
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn with_query(mut self, params: &[(&'static str, &str)]) -> Self {
        self.query
            .extend(params.iter().map(|(k, v)| (*k, v.to_string())));
        self
    }

    /// Path plus query string, for logs and test assertions. Never contains credentials.
    pub fn target(&self) -> String {
        let path = match &self.endpoint {
            Endpoint::Rest(path) => path.as_str(),
            Endpoint::GraphQl => "graphql",
        };
        if self.query.is_empty() {
            return path.to_string();
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("{}?{}", path, query.join("&"))
    }
}

/// Issues requests on behalf of the gateway.
///
/// Implementations return the response body for success statuses and an error
/// for everything else. They must be safe to share between concurrent operations.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Install the bearer token used by every subsequent request.
    fn set_auth_token(&self, token: &str) -> Result<()>;

    async fn send(&self, request: &ApiRequest) -> Result<String>;
}
