//! Session token handling

use crate::config::JwtConfig;
use crate::domain::{Role, StringUuid};
use crate::error::{AppError, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub const SESSION_TOKEN_TYPE: &str = "session";

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    pub role: Role,
    /// Issuer
    pub iss: String,
    /// Token type discriminator
    #[serde(default)]
    pub token_type: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    pub fn user_id(&self) -> Result<StringUuid> {
        StringUuid::parse_str(&self.sub)
            .map_err(|_| AppError::Unauthorized("Not authorized, token failed".to_string()))
    }
}

/// JWT token manager
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
            algorithm: Algorithm::HS256,
        }
    }

    /// 5 seconds of leeway instead of the default 60.
    fn strict_validation(&self) -> Validation {
        let mut v = Validation::new(self.algorithm);
        v.leeway = 5;
        v
    }

    /// Issue a session token carrying the identity id and role
    pub fn issue_session_token(&self, user_id: StringUuid, role: Role) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.session_ttl_secs);

        let claims = SessionClaims {
            sub: user_id.to_string(),
            role,
            iss: self.config.issuer.clone(),
            token_type: SESSION_TOKEN_TYPE.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        let header = Header::new(self.algorithm);
        encode(&header, &claims, &self.encoding_key).map_err(|e| AppError::Internal(e.into()))
    }

    /// Verify signature, expiry, issuer and token type
    pub fn verify_session_token(&self, token: &str) -> Result<SessionClaims> {
        let mut validation = self.strict_validation();
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &validation)?;
        if token_data.claims.token_type != SESSION_TOKEN_TYPE {
            return Err(AppError::Unauthorized(
                "Not authorized, token failed".to_string(),
            ));
        }
        Ok(token_data.claims)
    }
}
