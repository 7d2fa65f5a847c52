//! Authenticated request client

pub mod descriptor;
pub mod envelope;

pub use descriptor::{Method, RequestDescriptor};
pub use envelope::{Envelope, classify};

use crate::config::{ConfigError, DEFAULT_CORS_ORIGIN, Settings};
use crate::error::ClientError;
use crate::session::{Session, TokenRefresher};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const ALLOW_HEADERS: &str = "Origin, X-Requested-With, Content-Type, Accept, Authorization";

/// Headers sent with every request
pub(crate) fn default_headers(cors_origin: &HeaderValue) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, cors_origin.clone());
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers
}

impl From<ConfigError> for ClientError {
    fn from(error: ConfigError) -> Self {
        Self::Configuration(error.to_string())
    }
}

/// Moderation API client
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    cors_origin: HeaderValue,
    default_timeout: Duration,
    session: Arc<Session>,
    refresher: TokenRefresher,
}

impl ApiClient {
    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Build a client from loaded settings
    pub fn from_settings(settings: &Settings, session: Arc<Session>) -> Result<Self, ClientError> {
        Self::builder()
            .base_url(&settings.api_url)
            .default_timeout(settings.timeout()?)
            .cors_origin(&settings.cors_origin)
            .session(session)
            .build()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn refresher(&self) -> &TokenRefresher {
        &self.refresher
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Perform one request with a bounded duration
    pub async fn send(&self, descriptor: &RequestDescriptor) -> Result<Envelope, ClientError> {
        let timeout = descriptor.timeout.unwrap_or(self.default_timeout);
        if timeout.is_zero() {
            return Err(ClientError::Configuration(
                "request timeout must be a positive duration".into(),
            ));
        }

        let mut request = self
            .http
            .request(descriptor.method.into(), self.url(&descriptor.path))
            .headers(default_headers(&self.cors_origin));

        if descriptor.authorization_required {
            let current = self
                .session
                .token()
                .ok_or_else(|| ClientError::Unauthenticated("no stored token".into()))?;
            let token = self.refresher.ensure_fresh_token(&current).await?;
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        if !descriptor.query.is_empty() {
            request = request.query(&descriptor.query);
        }
        if let Some(body) = &descriptor.body {
            request = request.json(body);
        }

        debug!(
            method = ?descriptor.method,
            path = %descriptor.path,
            timeout_ms = timeout.as_millis() as u64,
            "Sending request"
        );

        let exchange = async {
            let response = request
                .send()
                .await
                .map_err(|e| ClientError::from_transport(e, timeout))?;
            let status = response.status();
            let body = response
                .bytes()
                .await
                .map_err(|e| ClientError::from_transport(e, timeout))?;
            Ok::<_, ClientError>((status, body))
        };

        let (status, body) = match tokio::time::timeout(timeout, exchange).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(path = %descriptor.path, timeout_ms = timeout.as_millis() as u64, "Request timed out");
                return Err(ClientError::Timeout(timeout));
            }
        };

        debug!(path = %descriptor.path, status = status.as_u16(), "Received response");
        classify(status, &body)
    }
}

/// Builder for ApiClient
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    session: Option<Arc<Session>>,
    default_timeout: Option<Duration>,
    cors_origin: Option<String>,
    user_agent: Option<String>,
}

impl ApiClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the session holding the bearer token
    pub fn session(mut self, session: Arc<Session>) -> Self {
        self.session = Some(session);
        self
    }

    /// Timeout for descriptors that do not carry their own
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    pub fn cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origin = Some(origin.into());
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let base_url = self
            .base_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;
        let session = self
            .session
            .ok_or_else(|| ClientError::Configuration("session is required".into()))?;

        let default_timeout = self
            .default_timeout
            .unwrap_or(Duration::from_millis(crate::config::DEFAULT_TIMEOUT_MS as u64));
        if default_timeout.is_zero() {
            return Err(ClientError::Configuration(
                "default timeout must be a positive duration".into(),
            ));
        }

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();
        let cors_origin = self
            .cors_origin
            .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());
        let cors_origin = HeaderValue::from_str(&cors_origin).map_err(|_| {
            ClientError::Configuration(format!(
                "cors_origin {cors_origin:?} is not a valid header value"
            ))
        })?;

        let http = ClientBuilder::new()
            .user_agent(
                self.user_agent
                    .unwrap_or_else(|| concat!("nauan-client/", env!("CARGO_PKG_VERSION")).into()),
            )
            .build()?;

        let refresher = TokenRefresher::new(
            http.clone(),
            &base_url,
            cors_origin.clone(),
            default_timeout,
            session.clone(),
        );

        Ok(ApiClient {
            http,
            base_url,
            cors_origin,
            default_timeout,
            session,
            refresher,
        })
    }
}
