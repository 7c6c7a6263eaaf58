//! Encryption request types.
//!
//! Requests are constructed by the caller, validated by the engine, and
//! live only for the duration of a single call. PAN and CVV are zeroized
//! when the request is dropped.

use zeroize::Zeroize;

use crate::cse::digits::digits_only;

/// A full-card encryption request.
///
/// `holder_name` is optional: some processor flows tokenize without a name,
/// and an absent name is omitted from the canonical plaintext rather than
/// serialized as an empty field. All other fields are required.
///
/// # Security
///
/// - Never log the PAN or CVV.
/// - PAN and CVV are zeroized on drop.
///
/// # Examples
///
/// ```
/// use payment_cse::cse::CardEncryptRequest;
///
/// let request = CardEncryptRequest {
///     pan: "4111 1111 1111 1111".to_owned(),
///     holder_name: Some("JOHN DOE".to_owned()),
///     expiry_month: 12,
///     expiry_year: 2030,
///     cvv: "123".to_owned(),
///     nonce: "abc123".to_owned(),
/// };
///
/// assert_eq!(request.last_four(), "1111");
/// ```
#[derive(Debug, Clone)]
pub struct CardEncryptRequest {
    /// Card number (PAN); formatting characters are stripped before use.
    pub pan: String,
    /// Cardholder name as printed on the card, if the flow collects one.
    pub holder_name: Option<String>,
    /// Expiry month (1-12).
    pub expiry_month: u32,
    /// Expiry year, 2-digit or 4-digit.
    pub expiry_year: i32,
    /// Card verification value (CVV/CVC).
    pub cvv: String,
    /// Caller-supplied nonce, bound server-side to detect replay.
    pub nonce: String,
}

impl CardEncryptRequest {
    /// Returns the PAN with every non-digit character removed.
    #[must_use]
    pub(crate) fn pan_digits(&self) -> String {
        digits_only(&self.pan)
    }

    /// Returns the CVV with every non-digit character removed.
    #[must_use]
    pub(crate) fn cvv_digits(&self) -> String {
        digits_only(&self.cvv)
    }

    /// Returns the last four digits of the PAN for display.
    #[must_use]
    pub fn last_four(&self) -> String {
        let digits = self.pan_digits();
        if digits.len() >= 4 {
            digits[digits.len() - 4..].to_owned()
        } else {
            digits
        }
    }
}

impl Drop for CardEncryptRequest {
    fn drop(&mut self) {
        self.pan.zeroize();
        self.cvv.zeroize();
    }
}

/// A CVV-only encryption request.
///
/// Used when the PAN is already tokenized and only a fresh CVV needs to
/// travel. No PAN is available, so the brand-specific CVV length rule does
/// not apply; either 3 or 4 digits is accepted.
#[derive(Debug, Clone)]
pub struct CvvEncryptRequest {
    /// Card verification value (CVV/CVC).
    pub cvv: String,
    /// Caller-supplied nonce, bound server-side to detect replay.
    pub nonce: String,
}

impl CvvEncryptRequest {
    /// Returns the CVV with every non-digit character removed.
    #[must_use]
    pub(crate) fn cvv_digits(&self) -> String {
        digits_only(&self.cvv)
    }
}

impl Drop for CvvEncryptRequest {
    fn drop(&mut self) {
        self.cvv.zeroize();
    }
}
