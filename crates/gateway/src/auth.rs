//! Bearer-token issuance and validation (HS256 JWT).
//!
//! The signing secret is resolved once at startup from the env var named
//! in `config.auth.jwt_secret_env`; when unset an ephemeral per-process
//! secret is minted and a warning logged.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use rotom_domain::{Error, Result};
use rotom_users::UserProfile;

/// JWT claims for a user bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id).
    pub sub: String,
    pub username: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_hours: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours as i64),
        }
    }

    /// Issue a bearer token for a user.
    pub fn issue(&self, user: &UserProfile) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.clone(),
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| Error::Auth(format!("encoding token: {e}")))
    }

    /// Validate a token and return its claims. Expiry is enforced.
    pub fn validate(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| Error::Auth(format!("invalid token: {e}")))?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rotom_domain::ProficiencyTier;

    fn user() -> UserProfile {
        UserProfile {
            id: "u-123".into(),
            username: "ash".into(),
            skill_level: ProficiencyTier::Beginner,
        }
    }

    #[test]
    fn issue_then_validate_roundtrips() {
        let service = TokenService::new("test-secret", 1);
        let token = service.issue(&user()).unwrap();

        let claims = service.validate(&token).unwrap();
        assert_eq!(claims.sub, "u-123");
        assert_eq!(claims.username, "ash");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn garbage_token_is_rejected() {
        let service = TokenService::new("test-secret", 1);
        assert!(service.validate("not-a-jwt").is_err());
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let issuer = TokenService::new("secret-a", 1);
        let verifier = TokenService::new("secret-b", 1);

        let token = issuer.issue(&user()).unwrap();
        assert!(verifier.validate(&token).is_err());
    }
}
