//! Session context shared by every request
//!
//! A [`Session`] owns the token store and the cached expiry of the current
//! token. Concurrent requests read it freely. Refreshes are not serialized:
//! two requests that both see an expired token will both call the refresh
//! endpoint, and whichever stores its token last becomes current. Either
//! token is usable, so the duplicate refresh is accepted rather than locked
//! away.

pub mod claims;
pub mod refresh;
pub mod store;

pub use claims::{Claims, DecodeError, decode_claims, is_expired};
pub use refresh::{REFRESH_SAFETY_MARGIN_SECS, TokenRefresher};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};

use std::sync::{Arc, Mutex};
use tracing::debug;

/// Current epoch seconds
pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Token and cached expiry for one signed-in profile
pub struct Session {
    store: Arc<dyn TokenStore>,
    cached_expiry: Mutex<Option<i64>>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            cached_expiry: Mutex::new(None),
        }
    }

    /// Session backed by an in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    pub fn token(&self) -> Option<String> {
        self.store.get_token()
    }

    /// Replace the current token; the cached expiry is invalidated
    pub fn set_token(&self, token: &str) {
        self.store.set_token(token);
        self.reset_expiry();
    }

    /// Forget the token and its cached expiry
    pub fn clear_token(&self) {
        self.store.clear_token();
        self.reset_expiry();
        debug!("Session token cleared");
    }

    /// Last known expiry of the current token, `None` when unknown
    pub fn cached_expiry(&self) -> Option<i64> {
        self.cached_expiry.lock().ok().and_then(|slot| *slot)
    }

    pub fn cache_expiry(&self, exp: i64) {
        if let Ok(mut slot) = self.cached_expiry.lock() {
            *slot = Some(exp);
        }
    }

    fn reset_expiry(&self) {
        if let Ok(mut slot) = self.cached_expiry.lock() {
            *slot = None;
        }
    }

    /// Claims of the stored token if it is still valid
    pub fn resume(&self) -> Option<Claims> {
        let token = self.token()?;
        let claims = decode_claims(&token).ok()?;
        if claims.expires_within(now_secs(), 0) {
            return None;
        }
        self.cache_expiry(claims.exp);
        Some(claims)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("has_token", &self.token().is_some())
            .field("cached_expiry", &self.cached_expiry())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn token_expiring_at(exp: i64) -> String {
        format!(
            "h.{}.s",
            URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp},"urole":"Admin"}}"#))
        )
    }

    #[test]
    fn set_token_invalidates_cached_expiry() {
        let session = Session::in_memory();
        session.cache_expiry(123);
        session.set_token("next");
        assert_eq!(session.cached_expiry(), None);
        assert_eq!(session.token().as_deref(), Some("next"));
    }

    #[test]
    fn clear_token_resets_everything() {
        let session = Session::new(Arc::new(MemoryTokenStore::with_token("abc")));
        session.cache_expiry(123);
        session.clear_token();
        assert_eq!(session.token(), None);
        assert_eq!(session.cached_expiry(), None);
    }

    #[test]
    fn resume_accepts_only_unexpired_tokens() {
        let session = Session::in_memory();
        assert!(session.resume().is_none());

        session.set_token(&token_expiring_at(now_secs() - 10));
        assert!(session.resume().is_none());

        let exp = now_secs() + 3600;
        session.set_token(&token_expiring_at(exp));
        let claims = session.resume().unwrap();
        assert_eq!(claims.role.as_deref(), Some("Admin"));
        assert_eq!(session.cached_expiry(), Some(exp));
    }

    #[test]
    fn resume_ignores_garbage() {
        let session = Session::new(Arc::new(MemoryTokenStore::with_token("garbage")));
        assert!(session.resume().is_none());
    }
}
