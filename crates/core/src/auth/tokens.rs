use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use super::{decode_hex, encode_hex};
use crate::domain::user::UserId;

type HmacSha256 = Hmac<Sha256>;

/// An issued session token in wire form: `<payload-hex>.<signature-hex>`
/// where the payload is the canonical JSON claims and the signature is
/// HMAC-SHA256 over the payload bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
}

#[derive(Clone)]
pub struct TokenSigner {
    secret: SecretString,
}

impl TokenSigner {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    pub fn issue(&self, user_id: &UserId, ttl_hours: u64) -> SessionToken {
        let now = Utc::now();
        let ttl = Duration::hours(i64::try_from(ttl_hours).unwrap_or(i64::MAX / 3600));
        let claims = TokenClaims {
            sub: user_id.0.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        let payload =
            serde_json::to_vec(&claims).unwrap_or_else(|_| claims.sub.clone().into_bytes());
        let signature = self.sign(&payload);
        SessionToken(format!("{}.{}", encode_hex(&payload), encode_hex(&signature)))
    }

    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let (payload_hex, signature_hex) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let payload = decode_hex(payload_hex).ok_or(TokenError::Malformed)?;
        let signature = decode_hex(signature_hex).ok_or(TokenError::Malformed)?;

        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| TokenError::InvalidSignature)?;
        mac.update(&payload);
        mac.verify_slice(&signature).map_err(|_| TokenError::InvalidSignature)?;

        let claims: TokenClaims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;
        if claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("hmac accepts any key length");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}
