//! Client for the Nau va An moderation API
//!
//! Layers, leaf to root: [`session`] keeps the bearer token and refreshes it
//! before it expires, [`client`] performs bounded, classified requests, and
//! [`resources`] exposes the moderation operations staff use.

pub mod client;
pub mod config;
pub mod error;
pub mod resources;
pub mod session;
pub mod types;

pub use client::{ApiClient, ApiClientBuilder, Envelope, Method, RequestDescriptor};
pub use config::{ConfigError, Settings};
pub use error::ClientError;
pub use resources::{
    LogSessionListener, ModerationApi, Outcome, ReportedFeed, ReportedTabs, SessionListener,
    SignIn, SignInOutcome, SignInRequest, SubmissionFilter,
};
pub use session::{Claims, FileTokenStore, MemoryTokenStore, Session, TokenStore};
