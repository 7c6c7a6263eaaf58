//! Asymmetric encryption of the canonical plaintext.
//!
//! The processor hands the integrating app an RSA public key; the engine
//! encrypts the canonical plaintext under it with OAEP (SHA-256) and ships
//! the result base64-encoded inside a versioned envelope. The padding
//! scheme is a fixed, documented choice and is never negotiated at call
//! time (see DESIGN.md for the OAEP decision).
//!
//! # Security
//!
//! - Holds no state; a parsed key is safe to share across threads.
//! - Never logs key material or plaintext.

use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::Oaep;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::cse::payload::SCHEMA_VERSION;
use crate::error::{CseError, Result};

/// OAEP overhead in bytes: two SHA-256 digests plus two framing bytes.
const OAEP_OVERHEAD: usize = 2 * 32 + 2;

/// RSA public key for envelope encryption.
///
/// Accepts either a full SPKI PEM block or the bare base64 DER body the
/// processor dashboard exports (the PEM payload without the BEGIN/END
/// lines). The key must be an RSA public key; 2048 bits or more in
/// practice, since smaller moduli cannot fit a card payload under OAEP.
///
/// # Examples
///
/// ```
/// use payment_cse::cse::RsaPublicKey;
///
/// let pem = "-----BEGIN PUBLIC KEY-----
/// MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEAu1SU1LfVLPHCozMxH2Mo
/// 4lgOEePzNm0tRgeLezV6ffAt0gunVTLw7onLRnrq0/IzW7yWR7QkrmBL7jTKEn5u
/// +qKhbwKfBstIs+bMY2Zkp18gnTxKLxoS2tFczGkPLPgizskuemMghRniWaoLcyeh
/// kd3qqGElvW/VDL5AaWTg0nLVkjRo9z+40RQzuVaE8AkAFmxZzow3x+VJYKdjykkJ
/// 0iT9wCS0DRTXu269V264Vf/3jvredZiKRkgwlL9xNAwxXFg0x/XFw005UWVRIkdg
/// cKWTjpBP2dPwVZ4WWC+9aGVd+Gyn1o0CLelf4rEjGoXbAAEgAqeGUxrcIlbjXfbc
/// mwIDAQAB
/// -----END PUBLIC KEY-----";
///
/// let key = RsaPublicKey::from_pem(pem)?;
/// let ciphertext = key.encrypt(b"v=1&c=123&n=abc")?;
/// assert!(!ciphertext.is_empty());
/// # Ok::<(), payment_cse::CseError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RsaPublicKey {
    key: rsa::RsaPublicKey,
}

impl RsaPublicKey {
    /// Parses a public key from PEM or bare base64 DER text.
    ///
    /// Armor lines are stripped and the remaining base64 body is decoded to
    /// an SPKI DER key, so both the framed and the bare export form parse
    /// through the same path.
    ///
    /// # Errors
    ///
    /// Returns [`CseError::PublicKeyEncoding`] if the input is empty, the
    /// base64 is malformed, or the decoded material is not an RSA SPKI key.
    pub fn from_pem(text: &str) -> Result<Self> {
        let body: String = text
            .lines()
            .filter(|line| !line.contains("-----"))
            .flat_map(str::chars)
            .filter(|c| !c.is_whitespace())
            .collect();
        if body.is_empty() {
            return Err(CseError::PublicKeyEncoding("public key is empty".to_owned()));
        }

        let der = base64::Engine::decode(&base64::engine::general_purpose::STANDARD, body)
            .map_err(|e| CseError::PublicKeyEncoding(format!("invalid base64 public key: {e}")))?;
        let key = rsa::RsaPublicKey::from_public_key_der(&der)
            .map_err(|e| CseError::PublicKeyEncoding(format!("invalid RSA public key: {e}")))?;

        Ok(Self { key })
    }

    /// Longest plaintext this key can encrypt under OAEP(SHA-256).
    #[must_use]
    pub fn max_plaintext_len(&self) -> usize {
        self.key.size().saturating_sub(OAEP_OVERHEAD)
    }

    /// Encrypts `plaintext` with RSA-OAEP(SHA-256) and returns the
    /// ciphertext as standard base64.
    ///
    /// OAEP is randomized, so repeated calls with identical input produce
    /// different ciphertexts that decrypt to the same bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CseError::PayloadTooLarge`] when `plaintext` exceeds
    /// [`max_plaintext_len`](Self::max_plaintext_len), and
    /// [`CseError::EncryptionFailed`] when the primitive rejects the
    /// operation.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String> {
        let max = self.max_plaintext_len();
        if plaintext.len() > max {
            return Err(CseError::PayloadTooLarge { len: plaintext.len(), max });
        }

        let mut rng = rand::thread_rng();
        let ciphertext = self
            .key
            .encrypt(&mut rng, Oaep::new::<Sha256>(), plaintext)
            .map_err(|e| CseError::EncryptionFailed(e.to_string()))?;

        Ok(base64::Engine::encode(&base64::engine::general_purpose::STANDARD, ciphertext))
    }
}

/// The versioned encrypted envelope sent to the processor.
///
/// `version` identifies the canonicalization schema of the plaintext so
/// fields can be added without breaking decryption consumers; `ciphertext`
/// is the base64-encoded RSA output. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedEnvelope {
    /// Canonicalization schema version.
    pub version: u32,
    /// Base64-encoded RSA ciphertext.
    pub ciphertext: String,
}

impl EncryptedEnvelope {
    /// Wraps a ciphertext in the current schema version.
    pub(crate) fn new(ciphertext: String) -> Self {
        Self { version: SCHEMA_VERSION, ciphertext }
    }

    /// Renders the envelope as its JSON wire string.
    ///
    /// # Errors
    ///
    /// Returns [`CseError::EncryptionFailed`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| CseError::EncryptionFailed(format!("envelope serialization failed: {e}")))
    }
}
