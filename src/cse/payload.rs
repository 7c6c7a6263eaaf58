//! Canonical plaintext construction.
//!
//! The processor binds the nonce to the encrypted payload server-side, so
//! the same logical input must always canonicalize to byte-identical
//! plaintext. Fields are serialized as `k=v` pairs joined by `&`, in a
//! fixed order, with the schema version tag first:
//!
//! ```text
//! v=1&p=<pan>&y=<yyyy>&m=<mm>&c=<cvv>&cn=<holder>&n=<nonce>
//! v=1&c=<cvv>&n=<nonce>
//! ```
//!
//! An absent holder name omits the `cn` pair entirely; it is never emitted
//! as an empty value. PAN and CVV are serialized digits-only, the month is
//! zero-padded to two digits, and 2-digit years are normalized to four.
//!
//! The only constructors are crate-private and are called by the engine
//! strictly after validation succeeds, so unvalidated data cannot reach the
//! encryptor through this type.

use chrono::{Datelike, Utc};
use zeroize::Zeroizing;

use crate::cse::request::{CardEncryptRequest, CvvEncryptRequest};
use crate::cse::validate::normalize_year;

/// Canonicalization schema version, also stamped into the envelope.
pub const SCHEMA_VERSION: u32 = 1;

/// The canonical plaintext of a validated request.
///
/// Holds card data in the clear; the backing buffer is zeroized on drop.
#[derive(Debug)]
pub struct CardPlaintext(Zeroizing<String>);

impl CardPlaintext {
    /// Canonicalizes a validated full-card request.
    pub(crate) fn for_card(request: &CardEncryptRequest) -> Self {
        let now = Utc::now();
        Self::for_card_at(request, now.year())
    }

    pub(crate) fn for_card_at(request: &CardEncryptRequest, now_year: i32) -> Self {
        let year = normalize_year(request.expiry_year, now_year);
        let mut plain = Zeroizing::new(format!(
            "v={}&p={}&y={}&m={:02}&c={}",
            SCHEMA_VERSION,
            request.pan_digits(),
            year,
            request.expiry_month,
            request.cvv_digits(),
        ));
        if let Some(name) = request.holder_name.as_deref() {
            plain.push_str("&cn=");
            plain.push_str(name.trim());
        }
        plain.push_str("&n=");
        plain.push_str(&request.nonce);
        Self(plain)
    }

    /// Canonicalizes a validated CVV-only request.
    pub(crate) fn for_cvv(request: &CvvEncryptRequest) -> Self {
        Self(Zeroizing::new(format!(
            "v={}&c={}&n={}",
            SCHEMA_VERSION,
            request.cvv_digits(),
            request.nonce,
        )))
    }

    /// The canonical bytes handed to the encryptor.
    #[must_use]
    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CardEncryptRequest {
        CardEncryptRequest {
            pan: "4111 1111 1111 1111".to_owned(),
            holder_name: Some("JOHN DOE".to_owned()),
            expiry_month: 3,
            expiry_year: 2030,
            cvv: "123".to_owned(),
            nonce: "abc123".to_owned(),
        }
    }

    #[test]
    fn test_card_plaintext_canonical_form() {
        let plain = CardPlaintext::for_card_at(&request(), 2026);
        assert_eq!(plain.as_bytes(), b"v=1&p=4111111111111111&y=2030&m=03&c=123&cn=JOHN DOE&n=abc123");
    }

    #[test]
    fn test_month_zero_padded() {
        let mut req = request();
        req.expiry_month = 11;
        let plain = CardPlaintext::for_card_at(&req, 2026);
        assert!(std::str::from_utf8(plain.as_bytes()).unwrap().contains("&m=11&"));
    }

    #[test]
    fn test_two_digit_year_normalized() {
        let mut req = request();
        req.expiry_year = 30;
        let plain = CardPlaintext::for_card_at(&req, 2026);
        assert!(std::str::from_utf8(plain.as_bytes()).unwrap().contains("&y=2030&"));
    }

    #[test]
    fn test_absent_holder_name_omits_field() {
        let mut req = request();
        req.holder_name = None;
        let plain = CardPlaintext::for_card_at(&req, 2026);
        assert_eq!(plain.as_bytes(), b"v=1&p=4111111111111111&y=2030&m=03&c=123&n=abc123");
    }

    #[test]
    fn test_holder_name_trimmed() {
        let mut req = request();
        req.holder_name = Some("  JOHN DOE  ".to_owned());
        let plain = CardPlaintext::for_card_at(&req, 2026);
        assert!(std::str::from_utf8(plain.as_bytes()).unwrap().contains("&cn=JOHN DOE&"));
    }

    #[test]
    fn test_deterministic() {
        let a = CardPlaintext::for_card_at(&request(), 2026);
        let b = CardPlaintext::for_card_at(&request(), 2026);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_cvv_only_form() {
        let req = CvvEncryptRequest { cvv: "1234".to_owned(), nonce: "n-1".to_owned() };
        let plain = CardPlaintext::for_cvv(&req);
        assert_eq!(plain.as_bytes(), b"v=1&c=1234&n=n-1");
    }
}
