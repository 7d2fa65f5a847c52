//! Staff sign-in

use super::LONG_TIMEOUT;
use crate::client::{ApiClient, RequestDescriptor};
use crate::error::ClientError;
use crate::session::{Claims, decode_claims};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Repeated submissions inside this window are dropped
pub const SIGN_IN_THROTTLE: Duration = Duration::from_secs(2);

/// Minimum password length accepted by the backend
pub const MIN_PASSWORD_LEN: usize = 8;

/// Role that may not use the admin portal
pub const END_USER_ROLE: &str = "User";

const SIGN_IN_PATH: &str = "auth/signin";

/// Username or email address
static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\w+([.-]?\w+)*(@\w+([.-]?\w+)*(\.\w{2,3})+)?$")
        .expect("identifier pattern should compile")
});

/// Credentials posted to the sign-in endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

impl SignInRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Local checks run before anything is sent
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(ClientError::Validation("fields must not be empty".into()));
        }
        if !IDENTIFIER.is_match(&self.email) {
            return Err(ClientError::Validation(
                "identifier is not a valid username or email".into(),
            ));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ClientError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct SignInResponse {
    #[serde(default)]
    token: Option<String>,
}

/// Result of a sign-in attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    /// Claims are `None` when the issued token is not a decodable JWT
    SignedIn(Option<Claims>),
    /// Dropped by the throttle, nothing was sent
    Suppressed,
}

/// Throttled sign-in against the auth endpoint
pub struct SignIn {
    client: ApiClient,
    window: Duration,
    last_attempt: Mutex<Option<Instant>>,
}

impl SignIn {
    pub fn new(client: ApiClient) -> Self {
        Self::with_window(client, SIGN_IN_THROTTLE)
    }

    pub fn with_window(client: ApiClient, window: Duration) -> Self {
        Self {
            client,
            window,
            last_attempt: Mutex::new(None),
        }
    }

    /// Leading-edge throttle: the first attempt runs, later ones inside the window do not
    fn admit(&self) -> bool {
        let Ok(mut last) = self.last_attempt.lock() else {
            return false;
        };
        let now = Instant::now();
        match *last {
            Some(previous) if now.duration_since(previous) < self.window => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }

    /// Validate, post and store the issued token
    pub async fn submit(&self, request: &SignInRequest) -> Result<SignInOutcome, ClientError> {
        request.validate()?;

        if !self.admit() {
            info!("Sign-in suppressed by throttle");
            return Ok(SignInOutcome::Suppressed);
        }

        let body = serde_json::to_value(request)?;
        let descriptor = RequestDescriptor::post(SIGN_IN_PATH, body).with_timeout(LONG_TIMEOUT);

        let response: SignInResponse = self.client.send(&descriptor).await?.into_typed()?;
        let token = response
            .token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ClientError::Unauthenticated("sign-in response carried no token".into()))?;

        // Opaque tokens are stored as-is; the refresher rejects them on first authorized use.
        let claims = decode_claims(&token).ok();
        if claims.as_ref().and_then(|c| c.role.as_deref()) == Some(END_USER_ROLE) {
            warn!("Refusing sign-in for end-user account");
            return Err(ClientError::RoleNotPermitted(
                "end users may not sign in to the admin portal".into(),
            ));
        }

        let session = self.client.session();
        session.set_token(&token);
        if let Some(claims) = &claims {
            session.cache_expiry(claims.exp);
        }
        info!(
            subject = ?claims.as_ref().and_then(|c| c.sub.as_deref()),
            "Signed in"
        );

        Ok(SignInOutcome::SignedIn(claims))
    }
}
