//! Payment CSE Library
//!
//! A client-side encryption (CSE) engine for payment card data. The engine
//! validates raw cardholder input (PAN, CVV, holder name, expiry, card
//! token, nonce) against payment-network rules and produces an encrypted,
//! versioned envelope for a payment processor. Plaintext card data never
//! leaves the device.
//!
//! # Overview
//!
//! The crate is the synchronous core consumed by a host bridge (mobile
//! runtime, FFI layer); the bridge owns callbacks, promises, and transport.
//! Everything here is call-and-return, CPU-bound, and stateless apart from
//! the facade's last-call error mirror.
//!
//! The central invariant: **data is encrypted only after it has passed
//! validation**. Validation failures are collected exhaustively, so one
//! call reports every violated rule, and they short-circuit before the
//! public key is even parsed.
//!
//! # Examples
//!
//! ```no_run
//! use payment_cse::cse::{CardEncryptRequest, Cse};
//!
//! # fn example() -> payment_cse::Result<()> {
//! let cse = Cse::new(false);
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
//! let public_key_pem = std::fs::read_to_string("processor_public_key.pem")
//!     .expect("key file");
//! let envelope = cse.encrypt_card(&request, &public_key_pem)?;
//!
//! // {"version":1,"ciphertext":"..."}
//! println!("{}", envelope.to_json()?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod cse;
pub mod error;

pub use cse::{CardBrand, Cse, EncryptedEnvelope};
pub use error::{CseError, Result};
