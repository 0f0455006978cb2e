use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rsa::pkcs8::spki::der::Decode;
use rsa::pkcs8::spki::{ObjectIdentifier, SubjectPublicKeyInfoRef};
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;

use crate::errors::SignatureError;

/// `rsaEncryption` (PKCS#1), the only algorithm accepted in the key container.
const RSA_ENCRYPTION_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// RSA public key used to check receipt signatures.
///
/// This is the "Base64-encoded RSA public key" shown in the Play Console for
/// an app: a DER SubjectPublicKeyInfo in standard, padded base64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    key: RsaPublicKey,
}

impl PublicKey {
    /// Decodes and parses a base64 key.
    ///
    /// Only the standard alphabet with canonical padding is accepted. No
    /// alternate encodings are tried.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::KeyDecode`] for bad base64 and
    /// [`SignatureError::KeyParse`] for anything that is not an RSA key.
    pub fn from_base64(public_key_b64: &str) -> Result<Self, SignatureError> {
        let der = STANDARD
            .decode(public_key_b64)
            .map_err(SignatureError::KeyDecode)?;
        Self::from_der(&der)
    }

    /// Parses a DER SubjectPublicKeyInfo holding an RSA key.
    pub fn from_der(der: &[u8]) -> Result<Self, SignatureError> {
        let spki = SubjectPublicKeyInfoRef::from_der(der).map_err(|e| {
            SignatureError::KeyParse(format!("not a SubjectPublicKeyInfo: {}", e))
        })?;
        if spki.algorithm.oid != RSA_ENCRYPTION_OID {
            return Err(SignatureError::KeyParse(format!(
                "key algorithm {} is not RSA",
                spki.algorithm.oid
            )));
        }

        let key = RsaPublicKey::from_public_key_der(der)
            .map_err(|e| SignatureError::KeyParse(format!("bad RSA public key: {}", e)))?;
        Ok(Self { key })
    }

    /// Modulus size in bytes; a well-formed signature has exactly this length.
    pub fn modulus_len(&self) -> usize {
        self.key.size()
    }

    pub(crate) fn rsa(&self) -> &RsaPublicKey {
        &self.key
    }
}

impl From<RsaPublicKey> for PublicKey {
    fn from(key: RsaPublicKey) -> Self {
        Self { key }
    }
}
