// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for warden-core.
//!
//! Token verification failures are deliberately absent here: `parse_subject`
//! and `validate` collapse them into `None` / `false`. See
//! [`VerificationFailure`](crate::token::VerificationFailure) for the
//! diagnostic form.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, WardenError>;

// =============================================================================
// WardenError
// =============================================================================

/// Errors raised by the token service, the access policy, and the gate.
#[derive(Debug, Error)]
pub enum WardenError {
    /// Caller supplied an unusable argument (empty subject, non-positive TTL).
    #[error("Invalid argument '{argument}': {message}")]
    InvalidArgument {
        /// Name of the offending argument.
        argument: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// The gate or policy was constructed from an inconsistent configuration.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message.
        message: String,
    },

    /// The operating system could not supply key material.
    #[error("Signing key generation failed: {message}")]
    KeyGeneration {
        /// Error message.
        message: String,
    },

    /// Encoding or signing a token failed.
    #[error("Failed to sign token: {message}")]
    Signing {
        /// Error message.
        message: String,
    },

    /// An external collaborator (OAuth flow, role lookup) reported a failure.
    #[error("Collaborator '{name}' failed: {message}")]
    Collaborator {
        /// Collaborator name.
        name: String,
        /// Error message.
        message: String,
    },
}

impl WardenError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(argument: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a key generation error.
    pub fn key_generation(message: impl Into<String>) -> Self {
        Self::KeyGeneration {
            message: message.into(),
        }
    }

    /// Creates a signing error.
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }

    /// Creates a collaborator error.
    pub fn collaborator(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Collaborator {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Returns the error code for categorization.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::KeyGeneration { .. } => "KEY_GENERATION_FAILED",
            Self::Signing { .. } => "SIGNING_FAILED",
            Self::Collaborator { .. } => "COLLABORATOR_FAILED",
        }
    }

    /// Returns `true` if the caller can fix this by changing its input.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Returns `true` if this error must abort startup.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::KeyGeneration { .. } | Self::Configuration { .. })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            WardenError::invalid_argument("subject", "empty").error_code(),
            "INVALID_ARGUMENT"
        );
        assert_eq!(
            WardenError::configuration("missing filter").error_code(),
            "CONFIGURATION_ERROR"
        );
        assert_eq!(
            WardenError::key_generation("no entropy").error_code(),
            "KEY_GENERATION_FAILED"
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(WardenError::invalid_argument("ttl_minutes", "negative").is_caller_error());
        assert!(!WardenError::configuration("x").is_caller_error());
        assert!(WardenError::key_generation("x").is_fatal());
        assert!(!WardenError::signing("x").is_fatal());
    }

    #[test]
    fn test_error_display() {
        let err = WardenError::invalid_argument("ttl_minutes", "must be positive, got 0");
        assert_eq!(
            err.to_string(),
            "Invalid argument 'ttl_minutes': must be positive, got 0"
        );

        let err = WardenError::collaborator("oauth", "client id missing");
        assert_eq!(err.to_string(), "Collaborator 'oauth' failed: client id missing");
    }
}
