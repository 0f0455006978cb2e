//! Receipt signature verification.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rsa::Pkcs1v15Sign;
use sha1::Sha1;

use crate::digest::ReceiptDigest;
use crate::errors::SignatureError;
use crate::key::PublicKey;

/// Verifies receipts against one parsed public key.
///
/// Parse the key once and reuse the verifier when checking many receipts for
/// the same app. The verifier is immutable and can be shared across threads.
#[derive(Debug, Clone)]
pub struct ReceiptVerifier {
    key: PublicKey,
}

impl ReceiptVerifier {
    /// Creates a verifier for an already parsed key.
    pub fn new(key: PublicKey) -> Self {
        Self { key }
    }

    /// Decodes and parses a base64 public key, then wraps it.
    pub fn from_base64(public_key_b64: &str) -> Result<Self, SignatureError> {
        PublicKey::from_base64(public_key_b64).map(Self::new)
    }

    /// The key this verifier checks against.
    pub fn public_key(&self) -> &PublicKey {
        &self.key
    }

    /// Verifies a base64 signature over the receipt bytes.
    ///
    /// Returns `Ok(false)` when the signature decodes but does not match.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::SignatureDecode`] if the signature is not
    /// standard padded base64.
    pub fn verify(&self, receipt: &[u8], signature_b64: &str) -> Result<bool, SignatureError> {
        let digest = ReceiptDigest::of(receipt);
        let signature = STANDARD
            .decode(signature_b64)
            .map_err(SignatureError::SignatureDecode)?;
        Ok(self.verify_digest(&digest, &signature))
    }

    /// Verifies raw signature bytes over the receipt bytes.
    pub fn verify_decoded(&self, receipt: &[u8], signature: &[u8]) -> bool {
        self.verify_digest(&ReceiptDigest::of(receipt), signature)
    }

    // PKCS#1 v1.5 with the SHA-1 DigestInfo prefix. A length mismatch is
    // reported by the rsa crate as a verification failure, i.e. `false`.
    fn verify_digest(&self, digest: &ReceiptDigest, signature: &[u8]) -> bool {
        self.key
            .rsa()
            .verify(Pkcs1v15Sign::new::<Sha1>(), digest.as_ref(), signature)
            .is_ok()
    }
}

/// Verifies that `receipt` was signed by the holder of `public_key_b64`.
///
/// Steps, in order, each failing fast:
/// 1. base64-decode and parse the RSA public key
/// 2. SHA-1 the receipt bytes
/// 3. base64-decode the signature
/// 4. check the RSASSA-PKCS1-v1_5 signature over the digest
///
/// `Ok(true)` means authentic, `Ok(false)` means the signature does not match
/// (tampered or forged receipt). Structural problems with the inputs are
/// errors and are never folded into `Ok(false)`.
///
/// # Example
///
/// ```rust,no_run
/// use playstore_signature::verify_signature;
///
/// let key = std::env::var("PLAY_PUBLIC_KEY")?;
/// let valid = verify_signature(&key, b"{\"orderId\":\"GPA.1\"}", "c2ln")?;
/// assert!(!valid);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
///
/// Returns [`SignatureError`] if the key or signature cannot be decoded or
/// the key is not RSA.
pub fn verify_signature(
    public_key_b64: &str,
    receipt: &[u8],
    signature_b64: &str,
) -> Result<bool, SignatureError> {
    ReceiptVerifier::from_base64(public_key_b64)?.verify(receipt, signature_b64)
}
