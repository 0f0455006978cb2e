//! Offline verification of Google Play in-app billing receipts.
//!
//! This crate provides:
//! - Decoding and parsing of the base64 public key from the Play Console
//! - SHA-1 digests of receipt bytes
//! - RSA PKCS#1 v1.5 signature checks with a strict error/invalid split
//!
//! Core invariants:
//! - Verification is deterministic and offline (no I/O, no randomness, no clock)
//! - Receipt bytes are hashed exactly as given, never normalized
//! - A malformed input is an error; a signature that does not match is `Ok(false)`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use playstore_signature::verify_signature;
//!
//! let public_key = "MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEA...";
//! let receipt = br#"{"orderId":"GPA.1234-5678-9012-34567","purchaseState":0}"#;
//! let signature = "dGhpcyBpcyBub3QgYSByZWFsIHNpZ25hdHVyZQ==";
//!
//! match verify_signature(public_key, receipt, signature) {
//!     Ok(true) => println!("receipt is authentic"),
//!     Ok(false) => println!("receipt was tampered with or forged"),
//!     Err(e) => eprintln!("cannot check receipt: {}", e),
//! }
//! ```
//!
//! ## Hash algorithm
//!
//! Play signs receipts with SHA-1 inside a PKCS#1 v1.5 signature. SHA-1 is
//! weak by modern standards but the algorithm is fixed by the signer; a
//! stronger hash would reject every genuine receipt.

#![deny(missing_docs)]

/// SHA-1 receipt digests.
pub mod digest;
/// Error types for signature verification.
pub mod errors;
/// Public key decoding and parsing.
pub mod key;
/// Receipt signature verification.
pub mod verification;

pub use digest::ReceiptDigest;
pub use errors::SignatureError;
pub use key::PublicKey;
pub use verification::{verify_signature, ReceiptVerifier};
