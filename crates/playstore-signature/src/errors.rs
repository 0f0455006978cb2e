use thiserror::Error;

/// Structural errors: inputs that could not be decoded or parsed.
///
/// A signature that decodes fine but does not match is not an error; see
/// [`verify_signature`](crate::verify_signature).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// The public key is not valid standard base64.
    #[error("failed to decode public key: {0}")]
    KeyDecode(#[source] base64::DecodeError),
    /// The decoded key is not a DER SubjectPublicKeyInfo holding an RSA key.
    #[error("failed to parse public key: {0}")]
    KeyParse(String),
    /// The signature is not valid standard base64.
    #[error("failed to decode signature: {0}")]
    SignatureDecode(#[source] base64::DecodeError),
}
