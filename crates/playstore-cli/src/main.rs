//! Playstore CLI - receipt signature checks and Google Play purchase management.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::product::{self, ProductAction};
use commands::subscription::{self, SubscriptionAction};
use commands::verify::{self, VerifyArgs};
use commands::ApiArgs;

/// Exit code for a signature that does not match.
const EXIT_INVALID: i32 = 1;

/// Exit code for malformed input or I/O failures during verification.
const EXIT_ERROR: i32 = 2;

#[derive(Parser)]
#[command(name = "playstore")]
#[command(about = "Google Play receipt verification and purchase management CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a receipt signature offline against the app's public key
    VerifySignature(VerifyArgs),
    /// Query and acknowledge one-time product purchases
    Product {
        #[command(flatten)]
        api: ApiArgs,
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Query and manage subscription purchases
    Subscription {
        #[command(flatten)]
        api: ApiArgs,
        #[command(subcommand)]
        action: SubscriptionAction,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::VerifySignature(args) => match verify::run(args) {
            Ok(true) => Ok(()),
            Ok(false) => std::process::exit(EXIT_INVALID),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(EXIT_ERROR);
            }
        },
        Commands::Product { api, action } => product::run(api, action).await,
        Commands::Subscription { api, action } => subscription::run(api, action).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
