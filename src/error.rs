//! Error types for the CSE engine.

use thiserror::Error;

use crate::cse::validate::ValidationErrors;

/// Result type alias for CSE operations.
pub type Result<T> = std::result::Result<T, CseError>;

/// Errors that can occur while validating or encrypting card data.
///
/// Validation failures are always recoverable by correcting the input and
/// never reach the encryptor. Key and primitive failures are surfaced as-is
/// and never retried: retrying a cryptographic failure with unchanged inputs
/// cannot succeed and must not be hidden from the caller.
#[derive(Debug, Error)]
pub enum CseError {
    /// One or more request fields violated a validation rule.
    ///
    /// Carries every violated rule for the call, in field order.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// The supplied public key could not be parsed.
    #[error("public key encoding failed: {0}")]
    PublicKeyEncoding(String),

    /// The canonical plaintext exceeds the maximum payload for the key's
    /// modulus under OAEP padding.
    #[error("payload of {len} bytes exceeds the {max} byte limit for this key")]
    PayloadTooLarge {
        /// Plaintext length in bytes.
        len: usize,
        /// Maximum plaintext length for the key and padding scheme.
        max: usize,
    },

    /// The RSA primitive rejected the operation.
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),
}

impl CseError {
    /// Returns the stable failure code reported to the host bridge.
    ///
    /// Codes match the poll-based error convention of the surrounding SDK:
    /// `VALIDATION_FAILED`, `PUBLIC_KEY_ENCODING_FAILED`, or
    /// `ENCRYPTION_FAILED` (which also covers oversized payloads).
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::PublicKeyEncoding(_) => "PUBLIC_KEY_ENCODING_FAILED",
            Self::PayloadTooLarge { .. } | Self::EncryptionFailed(_) => "ENCRYPTION_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cse::validate::{ValidationError, ValidationField};

    #[test]
    fn test_error_display() {
        let error = CseError::PublicKeyEncoding("bad PEM".into());
        assert_eq!(error.to_string(), "public key encoding failed: bad PEM");
    }

    #[test]
    fn test_payload_too_large_display() {
        let error = CseError::PayloadTooLarge { len: 200, max: 190 };
        assert!(error.to_string().contains("200"));
        assert!(error.to_string().contains("190"));
    }

    #[test]
    fn test_validation_code() {
        let errors = ValidationErrors::from(vec![ValidationError::new(
            ValidationField::Pan,
            "card number failed the Luhn check",
        )]);
        assert_eq!(CseError::Validation(errors).code(), "VALIDATION_FAILED");
    }

    #[test]
    fn test_encryption_codes_collapse() {
        assert_eq!(CseError::EncryptionFailed("primitive".into()).code(), "ENCRYPTION_FAILED");
        assert_eq!(CseError::PayloadTooLarge { len: 1, max: 0 }.code(), "ENCRYPTION_FAILED");
    }
}
