//! Subscription command implementation.

use clap::{Args, Subcommand};
use playstore_publisher::{
    AcknowledgeRequest, PackageName, PurchaseToken, SubscriptionId, SubscriptionService,
};

use super::{connect, ApiArgs};
use crate::output;

#[derive(Args)]
pub struct SubscriptionTarget {
    /// Application package name
    #[arg(long)]
    package: String,
    /// Subscription id
    #[arg(long)]
    subscription: String,
    /// Purchase token from the device
    #[arg(long)]
    token: String,
}

impl SubscriptionTarget {
    fn parse(
        &self,
    ) -> Result<(PackageName, SubscriptionId, PurchaseToken), Box<dyn std::error::Error>> {
        Ok((
            PackageName::parse(&self.package)?,
            SubscriptionId::parse(&self.subscription)?,
            PurchaseToken::parse(&self.token)?,
        ))
    }
}

#[derive(Subcommand)]
pub enum SubscriptionAction {
    /// Print the subscription state
    Get {
        #[command(flatten)]
        target: SubscriptionTarget,
    },
    /// Acknowledge the subscription
    Acknowledge {
        #[command(flatten)]
        target: SubscriptionTarget,
        /// Developer payload to attach
        #[arg(long)]
        payload: Option<String>,
    },
    /// Cancel; access continues until the paid period ends
    Cancel {
        #[command(flatten)]
        target: SubscriptionTarget,
    },
    /// Refund the current period without ending access
    Refund {
        #[command(flatten)]
        target: SubscriptionTarget,
    },
    /// Refund and end access immediately
    Revoke {
        #[command(flatten)]
        target: SubscriptionTarget,
    },
}

pub async fn run(
    api: ApiArgs,
    action: SubscriptionAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let (target, verb) = match &action {
        SubscriptionAction::Get { target } => (target, "get"),
        SubscriptionAction::Acknowledge { target, .. } => (target, "acknowledged"),
        SubscriptionAction::Cancel { target } => (target, "canceled"),
        SubscriptionAction::Refund { target } => (target, "refunded"),
        SubscriptionAction::Revoke { target } => (target, "revoked"),
    };
    let (package, subscription, token) = target.parse()?;
    let client = connect(&api)?;

    match action {
        SubscriptionAction::Get { .. } => {
            let purchase = client
                .verify_subscription(&package, &subscription, &token)
                .await?;
            println!("{}", output::format_json(&purchase));
            return Ok(());
        }
        SubscriptionAction::Acknowledge { payload, .. } => {
            let request = AcknowledgeRequest {
                developer_payload: payload,
            };
            client
                .acknowledge_subscription(&package, &subscription, &token, &request)
                .await?;
        }
        SubscriptionAction::Cancel { .. } => {
            client
                .cancel_subscription(&package, &subscription, &token)
                .await?;
        }
        SubscriptionAction::Refund { .. } => {
            client
                .refund_subscription(&package, &subscription, &token)
                .await?;
        }
        SubscriptionAction::Revoke { .. } => {
            client
                .revoke_subscription(&package, &subscription, &token)
                .await?;
        }
    }

    println!("{}", output::format_action(verb, token.as_ref()));
    Ok(())
}
