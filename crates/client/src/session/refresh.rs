//! Proactive token refresh

use super::{Session, decode_claims, is_expired, now_secs};
use crate::client::default_headers;
use crate::error::ClientError;
use reqwest::header::{self, HeaderValue};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tokens with this many seconds or fewer left are refreshed before use
pub const REFRESH_SAFETY_MARGIN_SECS: i64 = 5;

/// Path of the refresh endpoint, relative to the API base URL
pub const REFRESH_PATH: &str = "auth/refreshtoken";

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(default)]
    token: Option<String>,
}

/// Exchanges near-expiry tokens for new ones
#[derive(Clone)]
pub struct TokenRefresher {
    http: reqwest::Client,
    url: String,
    cors_origin: HeaderValue,
    timeout: Duration,
    session: Arc<Session>,
}

impl TokenRefresher {
    pub(crate) fn new(
        http: reqwest::Client,
        base_url: &str,
        cors_origin: HeaderValue,
        timeout: Duration,
        session: Arc<Session>,
    ) -> Self {
        Self {
            http,
            url: format!("{base_url}/{REFRESH_PATH}"),
            cors_origin,
            timeout,
            session,
        }
    }

    /// Return a token that is valid for longer than the safety margin
    pub async fn ensure_fresh_token(&self, current: &str) -> Result<String, ClientError> {
        self.ensure_fresh_token_at(current, now_secs()).await
    }

    /// Same as [`Self::ensure_fresh_token`] with an explicit clock reading
    pub async fn ensure_fresh_token_at(
        &self,
        current: &str,
        now: i64,
    ) -> Result<String, ClientError> {
        let exp = match self.session.cached_expiry() {
            Some(exp) => exp,
            None => {
                let claims = decode_claims(current)
                    .map_err(|e| ClientError::Unauthenticated(format!("malformed token: {e}")))?;
                self.session.cache_expiry(claims.exp);
                claims.exp
            }
        };

        if !is_expired(exp, now, REFRESH_SAFETY_MARGIN_SECS) {
            debug!(remaining_secs = exp.saturating_sub(now), "Token still fresh");
            return Ok(current.to_string());
        }

        info!(remaining_secs = exp.saturating_sub(now), "Token near expiry, refreshing");
        let token = self.refresh(current).await?;

        let claims = decode_claims(&token).map_err(|e| {
            ClientError::Unauthenticated(format!("refresh returned a malformed token: {e}"))
        })?;
        self.session.set_token(&token);
        self.session.cache_expiry(claims.exp);

        Ok(token)
    }

    async fn refresh(&self, current: &str) -> Result<String, ClientError> {
        let request = self
            .http
            .post(&self.url)
            .headers(default_headers(&self.cors_origin))
            .header(header::AUTHORIZATION, format!("Bearer {current}"));

        let exchange = async {
            let response = request
                .send()
                .await
                .map_err(|e| ClientError::from_transport(e, self.timeout))?;
            let status = response.status();
            let body = response
                .bytes()
                .await
                .map_err(|e| ClientError::from_transport(e, self.timeout))?;
            Ok::<_, ClientError>((status, body))
        };

        let (status, body) = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| ClientError::Timeout(self.timeout))??;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Token refresh rejected");
            return Err(ClientError::Unauthenticated(format!(
                "token refresh failed with status {status}"
            )));
        }

        serde_json::from_slice::<RefreshResponse>(&body)
            .ok()
            .and_then(|response| response.token)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                warn!("Token refresh response carried no token");
                ClientError::Unauthenticated("refresh response carried no token".into())
            })
    }
}
