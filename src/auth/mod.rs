use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

/// Bearer token claims; `sub` is the account id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(account_id: Uuid) -> Self {
        Self::with_expiry(account_id, config::config().security.jwt_expiry_hours)
    }

    pub fn with_expiry(account_id: Uuid, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: account_id,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("JWT secret not configured")]
    InvalidSecret,
}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    generate_jwt_with(claims, &config::config().security.jwt_secret)
}

pub fn decode_jwt(token: &str) -> Result<Claims, JwtError> {
    decode_jwt_with(token, &config::config().security.jwt_secret)
}

pub fn generate_jwt_with(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn decode_jwt_with(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let claims = Claims::with_expiry(Uuid::new_v4(), 1);
        let token = generate_jwt_with(&claims, "secret").unwrap();
        assert_eq!(decode_jwt_with(&token, "secret").unwrap(), claims);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_jwt_with(&Claims::with_expiry(Uuid::new_v4(), 1), "secret").unwrap();
        assert!(matches!(
            decode_jwt_with(&token, "other"),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut claims = Claims::with_expiry(Uuid::new_v4(), 1);
        claims.exp = Utc::now().timestamp() - 3600;
        let token = generate_jwt_with(&claims, "secret").unwrap();
        assert!(decode_jwt_with(&token, "secret").is_err());
    }

    #[test]
    fn empty_secret_is_refused() {
        let claims = Claims::with_expiry(Uuid::new_v4(), 1);
        assert!(matches!(
            generate_jwt_with(&claims, ""),
            Err(JwtError::InvalidSecret)
        ));
    }
}
