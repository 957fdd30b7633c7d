use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::config::JwtConfig;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Token payload. Tokens carrying any other shape are rejected as malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Claims {
    pub user_id: Uuid,
    pub iat: i64, // issued at (unix timestamp)
    pub exp: i64, // expires at (unix timestamp)
}

#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("signing secret is empty")]
    EmptySecret,
    #[error("token encoding failed: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    SignatureInvalid,
    #[error("token has expired")]
    Expired,
    #[error("token uses an unexpected signing algorithm")]
    UnexpectedAlgorithm,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
            ErrorKind::InvalidAlgorithm => TokenError::UnexpectedAlgorithm,
            _ => TokenError::Malformed,
        }
    }
}

/// HS256 signing and verification keys, built once at startup.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Result<Self, SigningError> {
        if cfg.secret.is_empty() {
            return Err(SigningError::EmptySecret);
        }
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);
        Ok(Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            validation,
            ttl: Duration::hours(cfg.ttl_hours),
        })
    }

    /// Mint a token for `user_id` valid from now until now + ttl.
    pub fn issue(&self, user_id: Uuid) -> Result<String, SigningError> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            user_id,
            iat: now.unix_timestamp(),
            exp: (now + self.ttl).unix_timestamp(),
        };
        let token = self.sign(&claims)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    fn sign(&self, claims: &Claims) -> Result<String, SigningError> {
        Ok(encode(&Header::new(ALGORITHM), claims, &self.encoding)?)
    }

    /// Algorithm, signature, payload shape and expiry are all checked.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }

    pub fn validate(&self, token: &str) -> Result<Uuid, TokenError> {
        let claims = self.decode(token)?;
        debug!(user_id = %claims.user_id, "jwt verified");
        Ok(claims.user_id)
    }
}
