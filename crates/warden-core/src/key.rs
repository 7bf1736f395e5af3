// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Process-lifetime signing key.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{CoreResult, WardenError};

/// Signing key length in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Symmetric HMAC-SHA256 signing key.
///
/// Generated once from the OS CSPRNG when the token service starts and held
/// only in memory. Restarting the process invalidates every outstanding token.
pub struct SigningKey {
    bytes: [u8; KEY_LEN],
}

impl SigningKey {
    /// Generates a fresh key from the operating system's random source.
    pub fn generate() -> CoreResult<Self> {
        let mut bytes = [0u8; KEY_LEN];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| WardenError::key_generation(e.to_string()))?;
        Ok(Self { bytes })
    }

    /// Key strength in bits.
    pub fn bits(&self) -> usize {
        KEY_LEN * 8
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("bits", &self.bits())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_key() {
        let key = SigningKey::generate().unwrap();
        assert_eq!(key.as_bytes().len(), KEY_LEN);
        assert_eq!(key.bits(), 256);
    }

    #[test]
    fn test_keys_are_unique() {
        let a = SigningKey::generate().unwrap();
        let b = SigningKey::generate().unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_debug_redacts_material() {
        let key = SigningKey::generate().unwrap();
        let debug = format!("{:?}", key);
        assert!(debug.contains("REDACTED"));
        assert!(debug.contains("256"));
    }
}
