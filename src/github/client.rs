// GitHub API HTTP client.
// Handles authentication, rate limiting, and request/response processing.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use reqwest::{
    Client, RequestBuilder, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};

use super::transport::{ApiRequest, Endpoint, Method, Transport};
use super::types::RateLimit;

/// reqwest-backed [`Transport`] with bearer auth and rate limit tracking.
pub struct HttpTransport {
    client: Client,
    config: GatewayConfig,
    auth: RwLock<Option<HeaderValue>>,
    rate_limit: Mutex<RateLimit>,
}

impl HttpTransport {
    /// Create a transport. No token is set; call `set_auth_token` before first use.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();

        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_str(&config.api_version)
                .map_err(|e| GatewayError::Other(e.to_string()))?,
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| GatewayError::Other(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(GatewayError::Http)?;

        Ok(Self {
            client,
            config,
            auth: RwLock::new(None),
            rate_limit: Mutex::new(RateLimit::default()),
        })
    }

    /// Get the most recently observed rate limit.
    pub fn rate_limit(&self) -> RateLimit {
        *self.rate_limit.lock()
    }

    fn builder(&self, request: &ApiRequest) -> RequestBuilder {
        let url = match &request.endpoint {
            Endpoint::Rest(path) => self.config.rest_url(path),
            Endpoint::GraphQl => self.config.graphql_url.clone(),
        };

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Patch => self.client.patch(&url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if request.endpoint == Endpoint::GraphQl {
            builder = builder.header(ACCEPT, "application/json");
        }
        if let Some(auth) = self.auth.read().clone() {
            builder = builder.header(AUTHORIZATION, auth);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        builder
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&self, response: &Response) {
        let header = |name: &str| -> Option<u64> {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
        };

        let mut rate_limit = self.rate_limit.lock();
        if let Some(limit) = header("x-ratelimit-limit") {
            rate_limit.limit = limit;
        }
        if let Some(remaining) = header("x-ratelimit-remaining") {
            rate_limit.remaining = remaining;
        }
        if let Some(reset) = header("x-ratelimit-reset") {
            rate_limit.reset = reset;
        }
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(GatewayError::Unauthorized),
            StatusCode::NOT_FOUND => {
                let url = response.url().path().to_string();
                Err(GatewayError::NotFound(url))
            }
            StatusCode::FORBIDDEN if self.rate_limit().remaining == 0 => {
                let reset_at = reset_time(self.rate_limit().reset);
                warn!(reset_at = %reset_at, "GitHub rate limit exhausted");
                Err(GatewayError::RateLimited { reset_at })
            }
            status => Err(GatewayError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn set_auth_token(&self, token: &str) -> Result<()> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| GatewayError::InvalidToken)?;
        value.set_sensitive(true);
        *self.auth.write() = Some(value);
        Ok(())
    }

    async fn send(&self, request: &ApiRequest) -> Result<String> {
        debug!(method = ?request.method, target = %request.target(), "sending request");

        let response = self.builder(request).send().await?;
        self.update_rate_limit(&response);
        let response = self.check_response(response).await?;
        Ok(response.text().await?)
    }
}

fn reset_time(reset: u64) -> String {
    i64::try_from(reset)
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_invalid_token_rejected() {
        let transport = HttpTransport::new(GatewayConfig::default()).unwrap();
        let err = transport.set_auth_token("bad\ntoken").unwrap_err();
        assert!(matches!(err, GatewayError::InvalidToken));
        assert!(!err.to_string().contains("bad"));
    }

    #[test]
    fn test_auth_header_is_sensitive() {
        let transport = HttpTransport::new(GatewayConfig::default()).unwrap();
        transport.set_auth_token("ghp_secret").unwrap();

        let request = transport
            .builder(&ApiRequest::get("user"))
            .build()
            .unwrap();
        let auth = request.headers().get(AUTHORIZATION).unwrap();
        assert!(auth.is_sensitive());
        assert!(!format!("{:?}", auth).contains("ghp_secret"));
    }

    #[test]
    fn test_request_urls() {
        let transport = HttpTransport::new(GatewayConfig::default()).unwrap();

        let rest = transport
            .builder(&ApiRequest::get("repos/acme/widgets/labels").with_query(&[("per_page", "100")]))
            .build()
            .unwrap();
        assert_eq!(
            rest.url().as_str(),
            "https://api.github.com/repos/acme/widgets/labels?per_page=100"
        );
        assert!(rest.headers().get(AUTHORIZATION).is_none());

        let graph = transport
            .builder(&ApiRequest::graphql(json!({"query": "{}"})))
            .build()
            .unwrap();
        assert_eq!(graph.url().as_str(), "https://api.github.com/graphql");
        assert_eq!(graph.method(), &reqwest::Method::POST);
        assert_eq!(graph.headers().get(ACCEPT).unwrap(), "application/json");
    }

    #[test]
    fn test_reset_time_formatting() {
        assert_eq!(reset_time(0), "00:00:00");
        assert_eq!(reset_time(u64::MAX), "unknown");
        assert_eq!(reset_time(i64::MAX as u64 + 1), "unknown");
    }
}
