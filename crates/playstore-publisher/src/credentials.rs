//! Service-account key files.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::{PublisherError, PublisherResult};

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// JSON key of a Google Cloud service account with Play Console access.
///
/// Only the fields needed for the JWT-bearer token exchange are read.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Always `service_account`.
    #[serde(rename = "type")]
    pub key_type: String,
    /// Owning Cloud project.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Id of the signing key, sent as the JWT `kid`.
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// PEM-encoded RSA private key.
    pub private_key: String,
    /// Service account identity, the JWT issuer.
    pub client_email: String,
    /// OAuth2 token endpoint.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Parses a downloaded key file.
    pub fn from_json(json: &[u8]) -> PublisherResult<Self> {
        let key: Self = serde_json::from_slice(json).map_err(|e| PublisherError::Credentials {
            message: format!("malformed key file: {}", e),
        })?;
        if key.key_type != "service_account" {
            return Err(PublisherError::Credentials {
                message: format!("expected a service_account key, got '{}'", key.key_type),
            });
        }
        Ok(key)
    }

    /// Reads and parses a key file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> PublisherResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read(path).map_err(|e| PublisherError::Credentials {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_json(&json)
    }
}

// Never print the private key.
impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}
