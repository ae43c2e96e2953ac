use chrono::{Duration, Utc};
use error_stack::{Result, ResultExt};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;
use crate::models::id::UserId;

static JWT_ISSUER: &str = "panel.api.login";

/// Identity claim carried by every session token: who the caller is and
/// until when the claim holds. Verification never touches the store.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Jwt {
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub sub: UserId,
    pub name: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeJwtError {
    #[error("Token signature or claims are invalid")]
    InvalidToken,
    #[error("Token has expired")]
    ExpiredToken,
}

#[derive(Debug, Error)]
#[error("Failed to encode session token")]
pub struct EncodeJwtError;

impl Jwt {
    /// Fixed lifetime of a session token, from issuance to expiry.
    pub const TTL_SECS: i64 = 60 * 60;

    #[must_use]
    pub fn generate(id: UserId, username: String) -> Self {
        let now = Utc::now();
        Self {
            iat: now.timestamp(),
            exp: (now + Duration::seconds(Self::TTL_SECS)).timestamp(),
            iss: JWT_ISSUER.to_string(),
            sub: id,
            name: username,
        }
    }

    pub fn encode(&self, config: &config::Server) -> Result<String, EncodeJwtError> {
        let header = Header::new(Algorithm::HS512);
        let key = EncodingKey::from_secret(config.jwt_secret.as_str().as_bytes());

        jsonwebtoken::encode(&header, self, &key)
            .change_context(EncodeJwtError)
            .attach_printable("could not encode session token claims")
    }

    pub fn decode(
        config: &config::Server,
        token: &str,
    ) -> std::result::Result<Self, DecodeJwtError> {
        let key = DecodingKey::from_secret(config.jwt_secret.as_str().as_bytes());

        let mut validation = Validation::new(Algorithm::HS512);
        // Exact expiry; a token is good up to its embedded timestamp and
        // not a second longer.
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_issuer(&[JWT_ISSUER]);

        match jsonwebtoken::decode::<Self>(token, &key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(error) => match error.kind() {
                ErrorKind::ExpiredSignature => Err(DecodeJwtError::ExpiredToken),
                _ => Err(DecodeJwtError::InvalidToken),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DecodeJwtError, Jwt};
    use crate::config;
    use crate::models::id::UserId;
    use chrono::Utc;

    #[test]
    fn verifies_freshly_issued_tokens() {
        let config = config::Server::for_tests();
        let claims = Jwt::generate(UserId(7), "admin".to_string());
        assert_eq!(claims.exp - claims.iat, Jwt::TTL_SECS);

        let token = claims.encode(&config).expect("should encode");
        let decoded = Jwt::decode(&config, &token).expect("should decode");

        assert_eq!(decoded.sub, UserId(7));
        assert_eq!(decoded.name, "admin");
    }

    #[test]
    fn rejects_expired_tokens() {
        let config = config::Server::for_tests();
        let now = Utc::now().timestamp();
        let claims = Jwt {
            iat: now - 2 * Jwt::TTL_SECS,
            exp: now - Jwt::TTL_SECS,
            iss: super::JWT_ISSUER.to_string(),
            sub: UserId(7),
            name: "admin".to_string(),
        };

        let token = claims.encode(&config).expect("should encode");
        assert_eq!(
            Jwt::decode(&config, &token),
            Err(DecodeJwtError::ExpiredToken)
        );
    }

    #[test]
    fn rejects_tokens_signed_with_another_secret() {
        let config = config::Server::for_tests();
        let mut other = config::Server::for_tests();
        other.jwt_secret = crate::util::Sensitive::new("a-completely-different-secret".to_string());

        let token = Jwt::generate(UserId(7), "admin".to_string())
            .encode(&other)
            .expect("should encode");
        assert_eq!(
            Jwt::decode(&config, &token),
            Err(DecodeJwtError::InvalidToken)
        );
    }

    #[test]
    fn rejects_garbage() {
        let config = config::Server::for_tests();
        assert_eq!(
            Jwt::decode(&config, "definitely-not-a-token"),
            Err(DecodeJwtError::InvalidToken)
        );
    }
}
