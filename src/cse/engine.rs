//! The CSE engine facade.
//!
//! [`Cse`] ties the pieces together: requests are validated first, the
//! canonical plaintext is built only from requests that validated cleanly,
//! and the encryptor only ever sees canonical plaintext. Validation
//! failures short-circuit before the public key is even parsed.
//!
//! The facade also mirrors the most recent call's error messages behind a
//! lock for the poll-based convention of the surrounding bridge
//! ([`Cse::errors`] / [`Cse::has_errors`]). The mirror is replaced
//! wholesale on every call and is a convenience only; the returned
//! `Result` is the primary channel. Prefer one `Cse` instance per call
//! site; the mirror lock exists for callers that share one anyway.

use std::sync::{Mutex, PoisonError};

use tracing::{debug, instrument};

use crate::cse::brand::{self, CardBrand};
use crate::cse::encrypt::{EncryptedEnvelope, RsaPublicKey};
use crate::cse::payload::CardPlaintext;
use crate::cse::request::{CardEncryptRequest, CvvEncryptRequest};
use crate::cse::validate;
use crate::error::{CseError, Result};

/// Client-side encryption engine for payment card data.
///
/// Holds only construction-time configuration and the last-call error
/// mirror; every operation is otherwise stateless and CPU-bound.
///
/// # Examples
///
/// ```
/// use payment_cse::cse::Cse;
///
/// let cse = Cse::new(false);
/// assert!(cse.is_valid_pan("4111 1111 1111 1111"));
/// assert!(!cse.is_valid_pan("4111111111111112"));
/// ```
#[derive(Debug)]
pub struct Cse {
    development_mode: bool,
    last_errors: Mutex<Vec<String>>,
}

impl Cse {
    /// Creates an engine.
    ///
    /// `development_mode` is informational: it tells the caller which
    /// public key it is expected to configure, and nothing else. Validation
    /// and canonicalization rules are identical in both modes.
    #[must_use]
    pub fn new(development_mode: bool) -> Self {
        debug!(development_mode, "CSE engine created");
        Self { development_mode, last_errors: Mutex::new(Vec::new()) }
    }

    /// Returns the construction-time development-mode flag.
    #[must_use]
    pub fn development_mode(&self) -> bool {
        self.development_mode
    }

    // ---- field-level validation, for UI feedback ----

    /// See [`validate::is_valid_pan`].
    #[must_use]
    pub fn is_valid_pan(&self, pan: &str) -> bool {
        validate::is_valid_pan(pan)
    }

    /// See [`validate::is_valid_cvv`].
    #[must_use]
    pub fn is_valid_cvv(&self, cvv: &str, pan: Option<&str>) -> bool {
        validate::is_valid_cvv(cvv, pan)
    }

    /// See [`validate::is_valid_card_holder_name`].
    #[must_use]
    pub fn is_valid_card_holder_name(&self, name: &str) -> bool {
        validate::is_valid_card_holder_name(name)
    }

    /// See [`validate::is_valid_expiry`].
    #[must_use]
    pub fn is_valid_expiry(&self, month: u32, year: i32) -> bool {
        validate::is_valid_expiry(month, year)
    }

    /// See [`validate::is_valid_card_token`].
    #[must_use]
    pub fn is_valid_card_token(&self, token: &str) -> bool {
        validate::is_valid_card_token(token)
    }

    /// See [`brand::detect_brand`].
    #[must_use]
    pub fn detect_brand(&self, pan: &str) -> CardBrand {
        brand::detect_brand(pan)
    }

    // ---- encryption entry points ----

    /// Validates and encrypts a full-card request.
    ///
    /// Runs every applicable rule and returns all violations at once as
    /// [`CseError::Validation`]; nothing is encrypted unless validation
    /// passes. On success the canonical plaintext is encrypted under
    /// `public_key` (PEM or bare base64 DER) and returned as a versioned
    /// envelope.
    ///
    /// # Errors
    ///
    /// [`CseError::Validation`], [`CseError::PublicKeyEncoding`],
    /// [`CseError::PayloadTooLarge`], or [`CseError::EncryptionFailed`].
    #[instrument(skip_all)]
    pub fn encrypt_card(
        &self,
        request: &CardEncryptRequest,
        public_key: &str,
    ) -> Result<EncryptedEnvelope> {
        let outcome = match validate::validate_card(request) {
            Ok(()) => {
                let plaintext = CardPlaintext::for_card(request);
                Self::encrypt_plaintext(plaintext.as_bytes(), public_key)
            }
            Err(errors) => {
                debug!(error_count = errors.len(), "card request failed validation");
                Err(CseError::Validation(errors))
            }
        };
        self.record_outcome(&outcome);
        outcome
    }

    /// Validates and encrypts a CVV-only request.
    ///
    /// No PAN is available, so the brand-specific CVV length rule does not
    /// apply; either 3 or 4 digits is accepted.
    ///
    /// # Errors
    ///
    /// Same set as [`Cse::encrypt_card`].
    #[instrument(skip_all)]
    pub fn encrypt_cvv(
        &self,
        request: &CvvEncryptRequest,
        public_key: &str,
    ) -> Result<EncryptedEnvelope> {
        let outcome = match validate::validate_cvv_only(request) {
            Ok(()) => {
                let plaintext = CardPlaintext::for_cvv(request);
                Self::encrypt_plaintext(plaintext.as_bytes(), public_key)
            }
            Err(errors) => {
                debug!(error_count = errors.len(), "cvv request failed validation");
                Err(CseError::Validation(errors))
            }
        };
        self.record_outcome(&outcome);
        outcome
    }

    // ---- last-call error mirror ----

    /// Returns the most recent call's error messages, in validation order.
    ///
    /// Empty after a successful call. Replaced wholesale on every
    /// encryption call, never appended across calls.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.mirror().clone()
    }

    /// Returns `true` if the most recent encryption call failed.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.mirror().is_empty()
    }

    // ---- internals ----

    fn encrypt_plaintext(plaintext: &[u8], public_key: &str) -> Result<EncryptedEnvelope> {
        let key = RsaPublicKey::from_pem(public_key)?;
        let ciphertext = key.encrypt(plaintext)?;
        Ok(EncryptedEnvelope::new(ciphertext))
    }

    fn record_outcome(&self, outcome: &Result<EncryptedEnvelope>) {
        let mut mirror = self.mirror();
        match outcome {
            Ok(_) => mirror.clear(),
            Err(CseError::Validation(errors)) => *mirror = errors.messages(),
            Err(other) => *mirror = vec![other.to_string()],
        }
    }

    fn mirror(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        // A poisoned mirror only means a panicking thread died mid-update;
        // the replaced-wholesale contract makes the contents still usable.
        self.last_errors.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
