//! Field validation for card data.
//!
//! Each predicate answers a single field-level question and is safe to call
//! from UI code on every keystroke. Request-level validation
//! ([`validate_card`], [`validate_cvv_only`]) runs the full rule set for the
//! flow and accumulates every violated rule instead of short-circuiting, so
//! one call reports everything the user has to fix.
//!
//! Rules encoded here are payment-network rules, not local policy: PAN
//! length bounds and the Luhn check, brand-specific CVV lengths (American
//! Express uses 4 digits, everyone else 3), processor limits on holder-name
//! length, and the not-yet-expired / not-absurdly-far-future window for
//! expiry dates.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::cse::brand::{detect_brand, CardBrand};
use crate::cse::digits::{digits_only, is_digits_only, luhn_check};
use crate::cse::request::{CardEncryptRequest, CvvEncryptRequest};

/// Shortest PAN any network issues.
pub const PAN_MIN_LEN: usize = 12;
/// Longest PAN any network issues.
pub const PAN_MAX_LEN: usize = 19;
/// Processors truncate holder names beyond this length.
pub const HOLDER_NAME_MAX_LEN: usize = 45;
/// Card tokens are opaque identifiers from a prior tokenization step.
pub const TOKEN_MIN_LEN: usize = 32;
/// Upper bound on card token length.
pub const TOKEN_MAX_LEN: usize = 64;
/// Upper bound on nonce length.
pub const NONCE_MAX_LEN: usize = 16;
/// An expiry further ahead than this is clearly erroneous input.
pub const MAX_EXPIRY_YEARS_AHEAD: i32 = 20;

/// The request field a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationField {
    /// Card number.
    Pan,
    /// Card verification value.
    Cvv,
    /// Cardholder name.
    HolderName,
    /// Expiry month.
    ExpiryMonth,
    /// Expiry year.
    ExpiryYear,
    /// Card token.
    Token,
    /// Caller-supplied nonce.
    Nonce,
}

impl ValidationField {
    /// Returns the field's snake_case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pan => "pan",
            Self::Cvv => "cvv",
            Self::HolderName => "holder_name",
            Self::ExpiryMonth => "expiry_month",
            Self::ExpiryYear => "expiry_year",
            Self::Token => "token",
            Self::Nonce => "nonce",
        }
    }
}

impl std::fmt::Display for ValidationField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single violated validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// The field that violated a rule.
    pub field: ValidationField,
    /// Human-readable description of the violation.
    pub message: String,
}

impl ValidationError {
    /// Creates a validation error for `field`.
    pub(crate) fn new(field: ValidationField, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// The ordered, non-empty list of rules a request violated.
///
/// Produced only by [`validate_card`] and [`validate_cvv_only`]; a request
/// that validates cleanly yields `Ok(())`, never an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Iterates the violated rules in validation order.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Number of violated rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for validator-produced values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if any violated rule refers to `field`.
    #[must_use]
    pub fn contains_field(&self, field: ValidationField) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// Renders each violation as its display string, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
            first = false;
        }
        Ok(())
    }
}

/// Validates a PAN: digits-only length within the network-general
/// [`PAN_MIN_LEN`]..=[`PAN_MAX_LEN`] range and a passing Luhn checksum.
///
/// A PAN failing the Luhn check is invalid regardless of length.
#[must_use]
pub fn is_valid_pan(pan: &str) -> bool {
    let digits = digits_only(pan);
    (PAN_MIN_LEN..=PAN_MAX_LEN).contains(&digits.len()) && luhn_check(&digits)
}

/// Validates a CVV, optionally against the PAN it belongs to.
///
/// With a PAN, the brand decides the required length: 4 digits for American
/// Express, 3 for every other brand (including `Unknown`). Without a PAN
/// there is no brand to consult, so either accepted length passes.
#[must_use]
pub fn is_valid_cvv(cvv: &str, pan: Option<&str>) -> bool {
    let cvv = cvv.trim();
    if !is_digits_only(cvv) {
        return false;
    }
    match pan {
        Some(pan) => cvv.len() == required_cvv_len(detect_brand(pan)),
        None => cvv.len() == 3 || cvv.len() == 4,
    }
}

/// CVV length required by a brand.
const fn required_cvv_len(brand: CardBrand) -> usize {
    match brand {
        CardBrand::AmericanExpress => 4,
        _ => 3,
    }
}

/// Validates a cardholder name: non-empty after trimming, at most
/// [`HOLDER_NAME_MAX_LEN`] characters, and not composed solely of digits
/// (which would mean the PAN landed in the wrong field).
#[must_use]
pub fn is_valid_card_holder_name(name: &str) -> bool {
    let name = name.trim();
    let len = name.chars().count();
    (1..=HOLDER_NAME_MAX_LEN).contains(&len) && !name.chars().all(|c| c.is_ascii_digit())
}

/// Validates an expiry date against the current month, UTC.
///
/// Two-digit years map to the current century. The pair must not be
/// strictly before the current (year, month), since a card expires at the
/// end of its named month, and must not be more than
/// [`MAX_EXPIRY_YEARS_AHEAD`] years out.
#[must_use]
pub fn is_valid_expiry(month: u32, year: i32) -> bool {
    let now = Utc::now();
    expiry_error_at(month, year, now.year(), now.month()).is_none()
}

/// Validates a card token: opaque alphanumeric identifier within
/// [`TOKEN_MIN_LEN`]..=[`TOKEN_MAX_LEN`]. Tokens are not checksummed.
#[must_use]
pub fn is_valid_card_token(token: &str) -> bool {
    (TOKEN_MIN_LEN..=TOKEN_MAX_LEN).contains(&token.len())
        && token.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Validates a nonce: non-empty, at most [`NONCE_MAX_LEN`] characters, and
/// restricted to alphanumerics plus `-`, `_`, and `.`.
///
/// The nonce is embedded verbatim in the canonical plaintext, so the
/// charset excludes the `&` and `=` separators and anything else that
/// could alter the serialization.
#[must_use]
pub fn is_valid_nonce(nonce: &str) -> bool {
    !nonce.is_empty()
        && nonce.len() <= NONCE_MAX_LEN
        && nonce.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Maps a 2-digit year into the century of `now_year`; 4-digit years pass
/// through unchanged.
pub(crate) const fn normalize_year(year: i32, now_year: i32) -> i32 {
    if 0 <= year && year < 100 {
        (now_year / 100) * 100 + year
    } else {
        year
    }
}

/// Returns the violated expiry rule, if any, against an explicit "now".
fn expiry_error_at(month: u32, year: i32, now_year: i32, now_month: u32) -> Option<ValidationError> {
    if !(1..=12).contains(&month) {
        return Some(ValidationError::new(
            ValidationField::ExpiryMonth,
            "expiry month must be between 1 and 12",
        ));
    }

    let year = normalize_year(year, now_year);
    if year < now_year {
        return Some(ValidationError::new(ValidationField::ExpiryYear, "expiry year has passed"));
    }
    if year > now_year + MAX_EXPIRY_YEARS_AHEAD {
        return Some(ValidationError::new(
            ValidationField::ExpiryYear,
            "expiry year is too far in the future",
        ));
    }
    if year == now_year && month < now_month {
        return Some(ValidationError::new(ValidationField::ExpiryMonth, "card has expired"));
    }

    None
}

/// Runs the full rule set for a full-card request and collects every
/// violation, in field order: PAN, expiry, holder name (when present),
/// CVV (against the PAN's brand), nonce.
pub fn validate_card(request: &CardEncryptRequest) -> Result<(), ValidationErrors> {
    let now = Utc::now();
    validate_card_at(request, now.year(), now.month())
}

pub(crate) fn validate_card_at(
    request: &CardEncryptRequest,
    now_year: i32,
    now_month: u32,
) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();
    let pan = request.pan_digits();

    if !is_valid_pan(&pan) {
        errors.push(ValidationError::new(ValidationField::Pan, "card number is not a valid PAN"));
    }

    if let Some(error) = expiry_error_at(request.expiry_month, request.expiry_year, now_year, now_month)
    {
        errors.push(error);
    }

    if let Some(name) = request.holder_name.as_deref() {
        if !is_valid_card_holder_name(name) {
            errors.push(ValidationError::new(
                ValidationField::HolderName,
                "holder name must be 1-45 characters and not digits only",
            ));
        }
    }

    if !is_valid_cvv(&request.cvv_digits(), Some(&pan)) {
        let message = match required_cvv_len(detect_brand(&pan)) {
            4 => "security code must be 4 digits for American Express",
            _ => "security code must be 3 digits",
        };
        errors.push(ValidationError::new(ValidationField::Cvv, message));
    }

    if !is_valid_nonce(&request.nonce) {
        errors.push(ValidationError::new(
            ValidationField::Nonce,
            "nonce must be 1-16 characters: alphanumeric, '-', '_' or '.'",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

/// Runs the rule set for a CVV-only request: CVV (either accepted length,
/// since no PAN is available) and nonce.
pub fn validate_cvv_only(request: &CvvEncryptRequest) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    if !is_valid_cvv(&request.cvv_digits(), None) {
        errors.push(ValidationError::new(
            ValidationField::Cvv,
            "security code must be 3 or 4 digits",
        ));
    }

    if !is_valid_nonce(&request.nonce) {
        errors.push(ValidationError::new(
            ValidationField::Nonce,
            "nonce must be 1-16 characters: alphanumeric, '-', '_' or '.'",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}
