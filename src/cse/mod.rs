//! Client-side encryption (CSE) core.
//!
//! This module implements the validation engine and encryption envelope
//! builder for payment card data. Raw cardholder input is validated
//! against payment-network rules, canonicalized into a deterministic
//! plaintext, and encrypted under a processor-supplied RSA public key.
//! Plaintext card data never leaves the process.
//!
//! # Pipeline
//!
//! ```text
//! caller → Cse::encrypt_card / Cse::encrypt_cvv
//!            → validate (collect every violated rule)
//!            → canonical plaintext (only on clean validation)
//!            → RSA-OAEP under the supplied public key
//!            → EncryptedEnvelope { version, ciphertext }
//! ```
//!
//! Validation failures short-circuit before the public key is parsed;
//! "never encrypt unvalidated data" is enforced structurally: the only
//! constructors of the canonical plaintext are crate-private and called by
//! the facade after validation succeeds.
//!
//! # Key Components
//!
//! - [`Cse`]: the engine facade and external API
//! - [`detect_brand`] / [`CardBrand`]: BIN-range brand detection
//! - [`validate`]: field predicates and request-level rule accumulation
//! - [`RsaPublicKey`] / [`EncryptedEnvelope`]: envelope encryption
//!
//! # Validation Rules
//!
//! - PAN: 12-19 digits and a passing Luhn checksum
//! - CVV: 3 digits, or 4 for American Express (either without a PAN)
//! - Holder name: 1-45 characters, not digits-only
//! - Expiry: month 1-12, not in the past, at most 20 years out;
//!   2-digit years map to the current century
//! - Card token: 32-64 alphanumeric characters
//! - Nonce: 1-16 characters, alphanumeric plus `-`, `_`, `.`
//!
//! # Security Considerations
//!
//! - PAN and CVV are zeroized when requests and plaintexts are dropped
//! - Card data, nonces, and key material are never logged
//! - The OAEP padding scheme is fixed at compile time, never negotiated
//! - `development_mode` changes which key the caller is expected to
//!   supply; it never relaxes validation or canonicalization
//!
//! # Examples
//!
//! ```
//! use payment_cse::cse::{CardBrand, CardEncryptRequest, Cse};
//!
//! # fn example() -> payment_cse::Result<()> {
//! let cse = Cse::new(false);
//!
//! assert_eq!(cse.detect_brand("4111111111111111"), CardBrand::Visa);
//!
//! let request = CardEncryptRequest {
//!     pan: "4111 1111 1111 1111".to_owned(),
//!     holder_name: Some("JOHN DOE".to_owned()),
//!     expiry_month: 12,
//!     expiry_year: 2030,
//!     cvv: "123".to_owned(),
//!     nonce: "abc123".to_owned(),
//! };
//!
//! let public_key = "-----BEGIN PUBLIC KEY-----\n...\n-----END PUBLIC KEY-----";
//! let envelope = cse.encrypt_card(&request, public_key)?;
//! println!("{}", envelope.to_json()?);
//! # Ok(())
//! # }
//! ```

pub mod brand;
pub mod digits;
pub mod encrypt;
pub mod engine;
pub mod payload;
pub mod request;
pub mod validate;

pub use brand::{detect_brand, CardBrand};
pub use encrypt::{EncryptedEnvelope, RsaPublicKey};
pub use engine::Cse;
pub use payload::SCHEMA_VERSION;
pub use request::{CardEncryptRequest, CvvEncryptRequest};
pub use validate::{ValidationError, ValidationErrors, ValidationField};

#[cfg(test)]
mod tests;
