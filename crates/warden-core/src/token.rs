// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bearer token issuance and validation.
//!
//! Tokens are compact HS256 JWS strings carrying `sub`, `iat` and `exp`
//! (seconds since the epoch). The signing key lives only in memory for the
//! lifetime of the process.
//!
//! Expiry is checked here rather than by `jsonwebtoken` so that every check
//! can be evaluated against an explicit instant (`*_at` methods), with no
//! clock-skew leeway.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::error::{CoreResult, WardenError};
use crate::key::SigningKey;

/// TTL applied by [`TokenService::issue_default`].
pub const DEFAULT_TTL_MINUTES: i64 = 30;

// =============================================================================
// TokenClaims
// =============================================================================

/// Claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (the principal the token was issued for).
    pub sub: String,
    /// Issued at (Unix timestamp, seconds).
    pub iat: i64,
    /// Expiration (Unix timestamp, seconds).
    pub exp: i64,
}

impl TokenClaims {
    /// Builds claims for `subject` issued at `issued_at` and living for `ttl`.
    pub fn new(subject: impl Into<String>, issued_at: DateTime<Utc>, ttl: Duration) -> CoreResult<Self> {
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| WardenError::invalid_argument("ttl_minutes", "expiry is out of range"))?;

        Ok(Self {
            sub: subject.into(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    /// Issue instant.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Expiry instant.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// A token is live strictly before `exp`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Time left before expiry at `now`, clamped to zero.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        Duration::seconds((self.exp - now.timestamp()).max(0))
    }
}

// =============================================================================
// VerificationFailure
// =============================================================================

/// Why a token was rejected.
///
/// Never returned from [`TokenService::parse_subject`] or
/// [`TokenService::validate`]; those collapse it to `None` / `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerificationFailure {
    /// Not a well-formed HS256 token with the required claims.
    #[error("token is malformed")]
    Malformed,
    /// Signature does not verify under this process's key.
    #[error("token signature is invalid")]
    BadSignature,
    /// Signature verifies but `exp` has passed.
    #[error("token has expired")]
    Expired,
}

impl VerificationFailure {
    /// Stable short name for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::BadSignature => "bad_signature",
            Self::Expired => "expired",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for VerificationFailure {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => Self::BadSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Malformed,
        }
    }
}

// =============================================================================
// TokenService
// =============================================================================

/// Issues and validates bearer tokens under a process-lifetime key.
///
/// Cheap to clone; all clones share the same key.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl TokenService {
    /// Generates a fresh signing key and builds the service around it.
    ///
    /// Key generation failure is fatal for the host.
    pub fn initialize() -> CoreResult<Self> {
        let key = SigningKey::generate()?;
        info!(bits = key.bits(), "Generated token signing key");
        Ok(Self::with_key(&key))
    }

    fn with_key(key: &SigningKey) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding_key: Arc::new(EncodingKey::from_secret(key.as_bytes())),
            decoding_key: Arc::new(DecodingKey::from_secret(key.as_bytes())),
            validation: Arc::new(validation),
        }
    }

    // =========================================================================
    // Issuance
    // =========================================================================

    /// Issues a token for `subject` valid for `ttl_minutes` from now.
    pub fn issue(&self, subject: &str, ttl_minutes: i64) -> CoreResult<String> {
        self.issue_at(subject, ttl_minutes, Utc::now())
    }

    /// Issues a token with the default 30 minute TTL.
    pub fn issue_default(&self, subject: &str) -> CoreResult<String> {
        self.issue(subject, DEFAULT_TTL_MINUTES)
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(&self, subject: &str, ttl_minutes: i64, now: DateTime<Utc>) -> CoreResult<String> {
        if subject.trim().is_empty() {
            return Err(WardenError::invalid_argument("subject", "must not be empty"));
        }
        if ttl_minutes <= 0 {
            return Err(WardenError::invalid_argument(
                "ttl_minutes",
                format!("must be positive, got {}", ttl_minutes),
            ));
        }

        let ttl = Duration::try_minutes(ttl_minutes)
            .ok_or_else(|| WardenError::invalid_argument("ttl_minutes", "value is too large"))?;
        let claims = TokenClaims::new(subject, now, ttl)?;

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| WardenError::signing(e.to_string()))?;

        debug!(subject = %subject, ttl_minutes, exp = claims.exp, "Issued token");
        Ok(token)
    }

    // =========================================================================
    // Verification
    // =========================================================================

    /// Returns the subject of a token whose signature verifies.
    ///
    /// Expiry is not checked. Returns `Ok(None)` for malformed or foreign
    /// tokens and `Err` only for an empty input.
    pub fn parse_subject(&self, token: &str) -> CoreResult<Option<String>> {
        if token.is_empty() {
            return Err(WardenError::invalid_argument("token", "must not be empty"));
        }

        match self.verify_signature(token) {
            Ok(claims) => Ok(Some(claims.sub)),
            Err(failure) => {
                trace!(reason = failure.as_str(), "Could not extract subject");
                Ok(None)
            }
        }
    }

    /// Returns `true` iff the token verifies, belongs to `expected_subject`,
    /// and has not expired.
    pub fn validate(&self, token: &str, expected_subject: &str) -> CoreResult<bool> {
        self.validate_at(token, expected_subject, Utc::now())
    }

    /// [`validate`](Self::validate) evaluated at `now`.
    pub fn validate_at(&self, token: &str, expected_subject: &str, now: DateTime<Utc>) -> CoreResult<bool> {
        if token.is_empty() {
            return Err(WardenError::invalid_argument("token", "must not be empty"));
        }

        match self.inspect_at(token, now) {
            Ok(claims) if claims.sub == expected_subject => Ok(true),
            Ok(_) => {
                debug!("Token subject does not match expected subject");
                Ok(false)
            }
            Err(failure) => {
                debug!(reason = failure.as_str(), "Token rejected");
                Ok(false)
            }
        }
    }

    /// Verifies signature and expiry, returning the claims or the failure kind.
    pub fn inspect(&self, token: &str) -> Result<TokenClaims, VerificationFailure> {
        self.inspect_at(token, Utc::now())
    }

    /// [`inspect`](Self::inspect) evaluated at `now`.
    pub fn inspect_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, VerificationFailure> {
        let claims = self.verify_signature(token)?;
        if claims.is_expired_at(now) {
            return Err(VerificationFailure::Expired);
        }
        Ok(claims)
    }

    fn verify_signature(&self, token: &str) -> Result<TokenClaims, VerificationFailure> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &"HS256")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
