//! Product command implementation.

use clap::{Args, Subcommand};
use playstore_publisher::{
    AcknowledgeRequest, PackageName, ProductId, ProductService, PurchaseToken,
};

use super::{connect, ApiArgs};
use crate::output;

#[derive(Args)]
pub struct ProductTarget {
    /// Application package name
    #[arg(long)]
    package: String,
    /// In-app product id (SKU)
    #[arg(long)]
    product: String,
    /// Purchase token from the device
    #[arg(long)]
    token: String,
}

impl ProductTarget {
    fn parse(&self) -> Result<(PackageName, ProductId, PurchaseToken), Box<dyn std::error::Error>> {
        Ok((
            PackageName::parse(&self.package)?,
            ProductId::parse(&self.product)?,
            PurchaseToken::parse(&self.token)?,
        ))
    }
}

#[derive(Subcommand)]
pub enum ProductAction {
    /// Print the purchase state
    Get {
        #[command(flatten)]
        target: ProductTarget,
    },
    /// Acknowledge the purchase
    Acknowledge {
        #[command(flatten)]
        target: ProductTarget,
        /// Developer payload to attach
        #[arg(long)]
        payload: Option<String>,
    },
}

pub async fn run(api: ApiArgs, action: ProductAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ProductAction::Get { target } => {
            let (package, product, token) = target.parse()?;
            let client = connect(&api)?;
            let purchase = client.verify_product(&package, &product, &token).await?;
            println!("{}", output::format_json(&purchase));
        }
        ProductAction::Acknowledge { target, payload } => {
            let (package, product, token) = target.parse()?;
            let request = AcknowledgeRequest {
                developer_payload: payload,
            };
            let client = connect(&api)?;
            client
                .acknowledge_product(&package, &product, &token, &request)
                .await?;
            println!("{}", output::format_action("acknowledged", token.as_ref()));
        }
    }
    Ok(())
}
