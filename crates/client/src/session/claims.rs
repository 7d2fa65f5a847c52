//! Bearer token claims
//!
//! Tokens are JWTs issued by the backend. The client never verifies the
//! signature; it only reads the payload to learn the expiry and role.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account id)
    #[serde(default)]
    pub sub: Option<String>,
    /// Account role
    #[serde(default, rename = "urole")]
    pub role: Option<String>,
    /// Expiration time (epoch seconds)
    pub exp: i64,
}

impl Claims {
    /// Whether the token expires within `margin_secs` of `now`
    pub fn expires_within(&self, now: i64, margin_secs: i64) -> bool {
        is_expired(self.exp, now, margin_secs)
    }
}

/// Token decoding failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("token must have three dot-separated segments, found {0}")]
    Malformed(usize),

    #[error("token payload is not valid base64url")]
    Encoding,

    #[error("token payload is not a claims object: {0}")]
    Payload(String),
}

/// Decode the payload segment of a JWT
pub fn decode_claims(token: &str) -> Result<Claims, DecodeError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(DecodeError::Malformed(segments.len()));
    }

    let payload = URL_SAFE_NO_PAD
        .decode(segments[1].trim_end_matches('='))
        .map_err(|_| DecodeError::Encoding)?;

    serde_json::from_slice(&payload).map_err(|e| DecodeError::Payload(e.to_string()))
}

/// Remaining validity at or below the margin counts as expired
pub fn is_expired(exp: i64, now: i64, margin_secs: i64) -> bool {
    exp.saturating_sub(now) <= margin_secs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with_payload(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn decodes_payload_fields() {
        let token = token_with_payload(r#"{"sub":"42","urole":"Admin","exp":1700000000,"iat":1}"#);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("42"));
        assert_eq!(claims.role.as_deref(), Some("Admin"));
        assert_eq!(claims.exp, 1_700_000_000);
    }

    #[test]
    fn tolerates_padded_payload() {
        let token = format!(
            "h.{}.s",
            base64::engine::general_purpose::URL_SAFE.encode(r#"{"exp":10}"#)
        );
        assert_eq!(decode_claims(&token).unwrap().exp, 10);
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert_eq!(decode_claims("abc"), Err(DecodeError::Malformed(1)));
        assert_eq!(decode_claims("a.b.c.d"), Err(DecodeError::Malformed(4)));
        assert_eq!(decode_claims("a.!!!.c"), Err(DecodeError::Encoding));
        assert!(matches!(
            decode_claims(&token_with_payload(r#"{"sub":"no-exp"}"#)),
            Err(DecodeError::Payload(_))
        ));
    }

    #[test]
    fn margin_is_inclusive() {
        assert!(is_expired(105, 100, 5));
        assert!(is_expired(90, 100, 5));
        assert!(!is_expired(106, 100, 5));
    }
}
