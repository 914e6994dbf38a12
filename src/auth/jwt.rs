//! JWT issue, validation and refresh.

use crate::error::{AppError, AppResult};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
    /// Unique per token; two tokens minted in the same second still differ.
    pub jti: Uuid,
}

/// HS256 signer/verifier over one shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    /// `ttl` must be positive and representable as a signed second count.
    pub fn new(secret: &str, ttl: std::time::Duration) -> AppResult<Self> {
        let ttl = i64::try_from(ttl.as_secs())
            .ok()
            .filter(|secs| *secs > 0)
            .and_then(Duration::try_seconds)
            .ok_or_else(|| AppError::Config(format!("token ttl out of range: {:?}", ttl)))?;
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    pub fn issue(&self, user_id: Uuid, email: &str) -> AppResult<String> {
        self.issue_at(user_id, email, Utc::now())
    }

    /// Issue a token as if minted at `now`; expiry is `now + ttl`.
    pub fn issue_at(&self, user_id: Uuid, email: &str, now: DateTime<Utc>) -> AppResult<String> {
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("token expiry overflows")))?;
        let claims = Claims {
            user_id,
            email: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("sign token: {}", e)))?;
        debug!(user_id = %user_id, exp = claims.exp, "token issued");
        Ok(token)
    }

    /// Signature and expiry are both checked, with no grace period past `exp`.
    /// Every failure is the same `Auth` error.
    pub fn validate(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!(error = %e, "token rejected");
            AppError::Auth("Invalid token".to_string())
        })?;
        Ok(data.claims)
    }

    /// Mint a fresh token carrying the same identity. The presented token is left untouched.
    pub fn refresh(&self, token: &str) -> AppResult<String> {
        let claims = self.validate(token)?;
        self.issue(claims.user_id, &claims.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-jwt-secret", std::time::Duration::from_secs(3600)).unwrap()
    }

    #[test]
    fn issued_token_carries_identity_and_one_hour_expiry() {
        let issuer = issuer();
        let id = Uuid::new_v4();
        let now = Utc::now();
        let token = issuer.issue_at(id, "a@x.com", now).unwrap();
        let claims = issuer.validate(&token).unwrap();
        assert_eq!(claims.user_id, id);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn tokens_minted_together_differ() {
        let issuer = issuer();
        let id = Uuid::new_v4();
        let now = Utc::now();
        let a = issuer.issue_at(id, "a@x.com", now).unwrap();
        let b = issuer.issue_at(id, "a@x.com", now).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn refresh_extends_expiry_and_keeps_identity() {
        let issuer = issuer();
        let id = Uuid::new_v4();
        let original = issuer
            .issue_at(id, "a@x.com", Utc::now() - Duration::minutes(10))
            .unwrap();
        let refreshed = issuer.refresh(&original).unwrap();

        let old = issuer.validate(&original).unwrap();
        let new = issuer.validate(&refreshed).unwrap();
        assert!(new.exp > old.exp);
        assert_eq!(new.user_id, old.user_id);
        assert_eq!(new.email, old.email);
        assert_ne!(new.jti, old.jti);
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = issuer();
        let token = issuer
            .issue_at(Uuid::new_v4(), "a@x.com", Utc::now() - Duration::hours(2))
            .unwrap();
        assert!(matches!(issuer.validate(&token), Err(AppError::Auth(_))));
        assert!(matches!(issuer.refresh(&token), Err(AppError::Auth(_))));
    }

    #[test]
    fn token_just_past_expiry_is_rejected() {
        let issuer = issuer();
        // exp lands five seconds in the past
        let token = issuer
            .issue_at(Uuid::new_v4(), "a@x.com", Utc::now() - Duration::seconds(3605))
            .unwrap();
        assert!(matches!(issuer.validate(&token), Err(AppError::Auth(_))));
        assert!(matches!(issuer.refresh(&token), Err(AppError::Auth(_))));
    }

    #[test]
    fn ttl_must_be_positive_and_in_range() {
        for ttl in [0, u64::MAX, i64::MAX as u64] {
            let result = TokenIssuer::new("s", std::time::Duration::from_secs(ttl));
            assert!(matches!(result, Err(AppError::Config(_))), "ttl {}", ttl);
        }
        assert!(TokenIssuer::new("s", std::time::Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let other =
            TokenIssuer::new("another-secret", std::time::Duration::from_secs(3600)).unwrap();
        let token = other.issue(Uuid::new_v4(), "a@x.com").unwrap();
        assert!(matches!(issuer().validate(&token), Err(AppError::Auth(_))));
    }

    #[test]
    fn garbage_is_rejected() {
        let issuer = issuer();
        for token in ["", "abc", "a.b.c"] {
            assert!(matches!(issuer.validate(token), Err(AppError::Auth(_))));
        }
    }
}
