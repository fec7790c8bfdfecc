//! HS256 access and refresh tokens.
//!
//! Both token kinds carry the same identity claims; they differ in lifetime,
//! signing secret and the `token_type` claim, so one can never stand in for
//! the other.

use crate::common::errors::ApiError;
use crate::config::Config;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub rfid: String,
    pub role: String,
    pub name: String,
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
}

/// Identity embedded in every token
#[derive(Debug, Clone)]
pub struct Identity {
    pub rfid: String,
    pub email: String,
    pub role: String,
    pub name: String,
}

impl From<&Claims> for Identity {
    fn from(claims: &Claims) -> Self {
        Self {
            rfid: claims.rfid.clone(),
            email: claims.email.clone(),
            role: claims.role.clone(),
            name: claims.name.clone(),
        }
    }
}

fn secret_for(token_type: TokenType, config: &Config) -> &[u8] {
    match token_type {
        TokenType::Access => config.jwt_secret.as_bytes(),
        TokenType::Refresh => config.jwt_refresh_secret.as_bytes(),
    }
}

fn issue(identity: &Identity, token_type: TokenType, config: &Config) -> Result<String, ApiError> {
    let now = Utc::now();
    let lifetime = match token_type {
        TokenType::Access => Duration::minutes(config.access_token_minutes),
        TokenType::Refresh => Duration::hours(config.refresh_token_hours),
    };
    let claims = Claims {
        sub: identity.rfid.clone(),
        email: identity.email.clone(),
        rfid: identity.rfid.clone(),
        role: identity.role.clone(),
        name: identity.name.clone(),
        token_type,
        iat: now.timestamp(),
        exp: (now + lifetime).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret_for(token_type, config)),
    )
    .map_err(|err| ApiError::Internal {
        message: format!("token signing failed: {err}"),
    })
}

fn decode_as(token: &str, expected: TokenType, config: &Config) -> Result<Claims, ApiError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret_for(expected, config)),
        &validation,
    )
    .map_err(|err| ApiError::InvalidToken(err.to_string()))?
    .claims;

    if claims.token_type != expected {
        return Err(ApiError::InvalidToken("wrong token type".to_string()));
    }
    Ok(claims)
}

/// Returns `(access, refresh)`
pub fn issue_pair(identity: &Identity, config: &Config) -> Result<(String, String), ApiError> {
    Ok((
        issue(identity, TokenType::Access, config)?,
        issue(identity, TokenType::Refresh, config)?,
    ))
}

pub fn decode_access(token: &str, config: &Config) -> Result<Claims, ApiError> {
    decode_as(token, TokenType::Access, config)
}

/// Exchange a valid refresh token for a fresh access token
pub fn refresh_access(refresh_token: &str, config: &Config) -> Result<String, ApiError> {
    let claims = decode_as(refresh_token, TokenType::Refresh, config)?;
    issue(&Identity::from(&claims), TokenType::Access, config)
}
