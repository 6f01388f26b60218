use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session validity window
const TOKEN_TTL_DAYS: i64 = 7;

/// JWT Claims - data stored in the token
///
/// Carries identity only: no password material, no roles. Roles are
/// resolved fresh from memberships on every authorized call.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub iat: i64,
    pub exp: i64,
}

/// Verification collapses every failure mode (bad signature, expiry,
/// malformed token) into this single outcome so callers cannot tell them
/// apart.
#[derive(Error, Debug)]
#[error("invalid or expired token")]
pub struct InvalidToken;

/// JWT Service - creates and verifies session tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a token for a user, valid for 7 days from now.
    pub fn issue(
        &self,
        id: &str,
        email: &str,
        full_name: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = Claims {
            id: id.to_string(),
            email: email.to_string(),
            full_name: full_name.to_string(),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };

        self.sign(&claims)
    }

    pub(crate) fn sign(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::default(), claims, &self.encoding_key)
    }

    /// Verify signature integrity and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, InvalidToken> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_issued_days_ago(days: i64) -> Claims {
        let issued = chrono::Utc::now() - chrono::Duration::days(days);
        Claims {
            id: "user-1".into(),
            email: "a@b.com".into(),
            full_name: "A B".into(),
            iat: issued.timestamp(),
            exp: (issued + chrono::Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        }
    }

    #[test]
    fn issue_and_verify_round_trip() {
        let service = JwtService::new("test_secret_key");
        let token = service.issue("user-1", "a@b.com", "A B").unwrap();

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.id, "user-1");
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.full_name, "A B");
    }

    #[test]
    fn token_lives_seven_days() {
        let service = JwtService::new("test_secret_key");
        let token = service.issue("user-1", "a@b.com", "A B").unwrap();
        let claims = service.verify(&token).unwrap();

        let lifetime = claims.exp - claims.iat;
        assert_eq!(lifetime, 7 * 24 * 3600);
    }

    #[test]
    fn six_day_old_token_is_accepted() {
        let service = JwtService::new("test_secret_key");
        let token = service.sign(&claims_issued_days_ago(6)).unwrap();
        assert!(service.verify(&token).is_ok());
    }

    #[test]
    fn eight_day_old_token_is_rejected() {
        let service = JwtService::new("test_secret_key");
        let token = service.sign(&claims_issued_days_ago(8)).unwrap();
        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issuer = JwtService::new("secret1");
        let verifier = JwtService::new("secret2");

        let token = issuer.issue("user-1", "a@b.com", "A B").unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        let service = JwtService::new("test_secret_key");
        assert!(service.verify("not-a-token").is_err());
        assert!(service.verify("").is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = JwtService::new("test_secret_key");
        let token = service.issue("user-1", "a@b.com", "A B").unwrap();

        // flip a character in the payload segment
        let mut tampered: Vec<String> = token.split('.').map(String::from).collect();
        tampered[1] = format!("x{}", &tampered[1][1..]);
        assert!(service.verify(&tampered.join(".")).is_err());
    }
}
