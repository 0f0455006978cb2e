use sha1::{Digest as Sha1Digest, Sha1};
use std::fmt;

/// SHA-1 digest of a receipt, the value Play signs.
///
/// The receipt is hashed in a single pass over the exact bytes supplied.
/// SHA-1 is dictated by the Play billing signature format and must not be
/// replaced with a stronger hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiptDigest([u8; 20]);

impl ReceiptDigest {
    /// Hashes the receipt bytes.
    pub fn of(receipt: &[u8]) -> Self {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&Sha1::digest(receipt));
        Self(bytes)
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Lowercase hex rendering, for diagnostics.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for ReceiptDigest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ReceiptDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
