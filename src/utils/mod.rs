use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::api::error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: uuid::Uuid,
    pub username: String,
    #[serde(default)]
    pub is_staff: bool,
    pub iat: u64,
    pub exp: u64,
}

impl Claims {
    pub fn new(sub: &uuid::Uuid, username: &str, is_staff: bool, exp: u64) -> Self {
        let now = chrono::Utc::now().timestamp() as u64;
        Claims { sub: *sub, username: username.to_string(), is_staff, iat: now, exp: now + exp }
    }

    #[allow(dead_code)]
    pub fn encode(&self, secret: &[u8]) -> Result<String, error::SystemError> {
        let header = Header::new(Algorithm::HS256);
        let token = encode(&header, self, &EncodingKey::from_secret(secret))?;
        Ok(token)
    }

    pub fn decode(token: &str, secret: &[u8]) -> Result<Self, error::SystemError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        let token_data = decode::<Self>(token, &DecodingKey::from_secret(secret), &validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_roundtrip() {
        let id = uuid::Uuid::now_v7();
        let token = Claims::new(&id, "alice", true, 60).encode(b"secret").unwrap();
        let claims = Claims::decode(&token, b"secret").unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.username, "alice");
        assert!(claims.is_staff);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = Claims::new(&uuid::Uuid::now_v7(), "alice", true, 60).encode(b"secret").unwrap();
        assert!(Claims::decode(&token, b"other").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut claims = Claims::new(&uuid::Uuid::now_v7(), "alice", true, 0);
        claims.exp = claims.iat.saturating_sub(3600);
        let token = claims.encode(b"secret").unwrap();
        assert!(Claims::decode(&token, b"secret").is_err());
    }
}
