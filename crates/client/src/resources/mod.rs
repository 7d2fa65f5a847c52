//! Typed moderation resources
//!
//! Every authorized call goes through [`ModerationApi::run`], which turns an
//! unauthenticated failure into the end of the session: the token is
//! cleared, the [`SessionListener`] is told to return to sign-in, and the
//! caller gets [`Outcome::SessionEnded`] instead of an error. Every other
//! failure is returned as-is and not retried.

pub mod auth;
pub mod download;
pub mod reports;
pub mod submissions;

pub use auth::{SignIn, SignInOutcome, SignInRequest};
pub use reports::{ReportedFeed, ReportedTabs};
pub use submissions::SubmissionFilter;

use crate::client::{ApiClient, Envelope, RequestDescriptor};
use crate::error::ClientError;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Timeout for listing and status updates
pub const LONG_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for detail lookups and the reported feed
pub const SHORT_TIMEOUT: Duration = Duration::from_secs(5);

/// View-layer hook for session termination
#[cfg_attr(test, mockall::automock)]
pub trait SessionListener: Send + Sync {
    /// The session is over; show the sign-in screen
    fn session_ended(&self);
}

/// Listener that only logs
#[derive(Debug, Default)]
pub struct LogSessionListener;

impl SessionListener for LogSessionListener {
    fn session_ended(&self) {
        info!("Session ended, sign-in required");
    }
}

/// Result of an authorized call
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Outcome<T> {
    Done(T),
    /// The session was terminated while handling the call
    SessionEnded,
}

impl<T> Outcome<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Done(value) => Some(value),
            Self::SessionEnded => None,
        }
    }

    pub fn is_session_ended(&self) -> bool {
        matches!(self, Self::SessionEnded)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Done(value) => Outcome::Done(f(value)),
            Self::SessionEnded => Outcome::SessionEnded,
        }
    }
}

/// Moderation API resources
#[derive(Clone)]
pub struct ModerationApi {
    client: ApiClient,
    listener: Arc<dyn SessionListener>,
}

impl ModerationApi {
    pub fn new(client: ApiClient, listener: Arc<dyn SessionListener>) -> Self {
        Self { client, listener }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Clear the token and notify the listener
    pub fn end_session(&self) {
        self.client.session().clear_token();
        self.listener.session_ended();
    }

    /// Send an authorized request, ending the session on auth failure
    pub async fn run(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<Outcome<Envelope>, ClientError> {
        let descriptor = descriptor.authorized();
        match self.client.send(&descriptor).await {
            Ok(envelope) => Ok(Outcome::Done(envelope)),
            Err(error) if error.is_auth_expired() => {
                info!(path = %descriptor.path, %error, "Ending session");
                self.end_session();
                Ok(Outcome::SessionEnded)
            }
            Err(error) => Err(error),
        }
    }
}
