// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Access-token signing/verification and refresh-token minting.
//!
//! Access tokens are HS256 JWTs that are never stored. Refresh tokens are
//! 32 random bytes in hex, valid for 60 days, and stored on the user.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::RefreshToken;

/// `iss` claim on every access token.
pub const ISSUER: &str = "chirpy";

/// Upper bound, and default, for access-token lifetime.
pub const MAX_ACCESS_TOKEN_TTL_SECS: u64 = 60 * 60;

/// Refresh-token lifetime.
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 60;

const REFRESH_TOKEN_BYTES: usize = 32;

/// Honor a requested TTL only if it is in `1..=3600`.
pub fn clamp_ttl(requested_secs: u64) -> u64 {
    if requested_secs == 0 || requested_secs > MAX_ACCESS_TOKEN_TTL_SECS {
        MAX_ACCESS_TOKEN_TTL_SECS
    } else {
        requested_secs
    }
}

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Issuer, always [`ISSUER`]
    pub iss: String,
    /// Subject (user id)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// A freshly signed access token.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: i64,
}

/// What a valid access token asserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedToken {
    pub user_id: u64,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Why an access token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token signature or algorithm is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is malformed")]
    Malformed,
}

impl From<TokenError> for AppError {
    fn from(_: TokenError) -> Self {
        AppError::Unauthenticated
    }
}

/// Issues and verifies tokens with one process-wide HMAC secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    rng: SystemRandom,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenIssuer {
    pub fn new(signing_key: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(signing_key),
            decoding_key: DecodingKey::from_secret(signing_key),
            validation,
            rng: SystemRandom::new(),
        }
    }

    /// Sign an access token for `user_id`. The TTL is clamped with [`clamp_ttl`].
    pub fn issue_access_token(&self, user_id: u64, ttl_secs: u64) -> Result<AccessToken, AppError> {
        let now = chrono::Utc::now().timestamp();
        let exp = now + clamp_ttl(ttl_secs) as i64;

        let claims = Claims {
            iss: ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: now,
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

        Ok(AccessToken {
            token,
            expires_at: exp,
        })
    }

    /// Check signature, algorithm, issuer and expiry; return the subject.
    pub fn verify_access_token(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        // Reject anything not declaring HS256 before touching the signature,
        // including algorithms jsonwebtoken cannot even parse (e.g. "none").
        if header_alg(token)?.as_str() != "HS256" {
            return Err(TokenError::InvalidSignature);
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature | ErrorKind::ImmatureSignature => TokenError::Expired,
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidIssuer => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            }
        })?;

        let user_id: u64 = data
            .claims
            .sub
            .parse()
            .map_err(|_| TokenError::Malformed)?;

        Ok(VerifiedToken {
            user_id,
            issued_at: data.claims.iat,
            expires_at: data.claims.exp,
        })
    }

    /// Mint a refresh token expiring 60 days from now.
    pub fn issue_refresh_token(&self) -> Result<RefreshToken, AppError> {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG failure")))?;

        let expires_at = (chrono::Utc::now() + chrono::Duration::days(REFRESH_TOKEN_TTL_DAYS))
            .timestamp();

        Ok(RefreshToken {
            refresh_token: hex::encode(bytes),
            expires_at,
        })
    }
}

/// The `alg` field of a compact JWT's header.
fn header_alg(token: &str) -> Result<String, TokenError> {
    let mut parts = token.split('.');
    let (Some(header), Some(_), Some(_), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::Malformed);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| TokenError::Malformed)?;
    let value: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)?;

    value
        .get("alg")
        .and_then(|alg| alg.as_str())
        .map(str::to_string)
        .ok_or(TokenError::Malformed)
}
