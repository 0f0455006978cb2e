//! Subcommand implementations.

use std::path::PathBuf;

use clap::Args;
use playstore_publisher::{PublisherClient, PublisherConfig, TokenProvider};

pub mod product;
pub mod subscription;
pub mod verify;

/// Connection options shared by the publisher subcommands.
#[derive(Args)]
pub struct ApiArgs {
    /// Service-account JSON key file
    #[arg(long, env = "PLAYSTORE_SERVICE_ACCOUNT", global = true)]
    service_account: Option<PathBuf>,
    /// Pre-issued OAuth2 access token, used instead of a service account
    #[arg(long, env = "PLAYSTORE_ACCESS_TOKEN", global = true, hide_env_values = true)]
    access_token: Option<String>,
    /// Android Publisher API base URL
    #[arg(long, env = "PLAYSTORE_API_URL", global = true)]
    base_url: Option<String>,
}

/// Builds an authenticated publisher client from the CLI options.
pub fn connect(api: &ApiArgs) -> Result<PublisherClient, Box<dyn std::error::Error>> {
    let mut config = PublisherConfig::from_env();
    if let Some(base_url) = &api.base_url {
        config = config.with_api_url(base_url.clone());
    }

    let client = match (&api.access_token, &api.service_account) {
        (Some(token), _) => PublisherClient::new(config, TokenProvider::static_token(token.clone()))?,
        (None, Some(path)) => PublisherClient::from_service_account_file(path, config)
            .map_err(|e| format!("Failed to load service account {}: {}", path.display(), e))?,
        (None, None) => {
            return Err(
                "no credentials: pass --service-account or set PLAYSTORE_SERVICE_ACCOUNT".into(),
            )
        }
    };
    Ok(client)
}
