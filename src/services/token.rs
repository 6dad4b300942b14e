//! Session token issuance and verification
//!
//! HS256 JSON Web Tokens with the user's email as subject. The email is the
//! login identifier, so a profile update that changes it must re-issue the
//! token.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's email
    pub sub: String,
    /// Expiration time (unix timestamp)
    pub exp: i64,
    /// Issued at (unix timestamp)
    pub iat: i64,
}

/// Issues and verifies signed session tokens.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    /// Create a token issuer from a shared secret and a lifetime in hours.
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Issue a signed token for the given user email.
    pub fn issue(&self, email: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: email.to_string(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).context("Failed to sign token")
    }

    /// Verify a token's signature and expiry, returning its claims.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .context("Invalid or expired token")?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify() {
        let issuer = TokenIssuer::new("test-secret", 1);

        let token = issuer.issue("a@x.com").expect("Failed to issue token");
        let claims = issuer.verify(&token).expect("Failed to verify token");

        assert_eq!(claims.sub, "a@x.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let issuer = TokenIssuer::new("secret-a", 1);
        let other = TokenIssuer::new("secret-b", 1);

        let token = issuer.issue("a@x.com").expect("Failed to issue token");

        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let issuer = TokenIssuer::new("test-secret", 1);
        assert!(issuer.verify("not.a.token").is_err());
    }

    #[test]
    fn test_verify_rejects_expired() {
        let issuer = TokenIssuer::new("test-secret", -1);

        let token = issuer.issue("a@x.com").expect("Failed to issue token");

        assert!(issuer.verify(&token).is_err());
    }
}
