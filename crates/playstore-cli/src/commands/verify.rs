//! Verify-signature command implementation.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use playstore_signature::{ReceiptDigest, ReceiptVerifier};

use crate::output;

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct KeySource {
    /// Base64 DER public key from the Play Console
    #[arg(long)]
    public_key: Option<String>,
    /// File holding the base64 public key
    #[arg(long)]
    public_key_file: Option<PathBuf>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct SignatureSource {
    /// Base64 signature delivered with the purchase
    #[arg(long)]
    signature: Option<String>,
    /// File holding the base64 signature
    #[arg(long)]
    signature_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct VerifyArgs {
    #[command(flatten)]
    key: KeySource,
    /// Receipt JSON file, or `-` to read stdin. Bytes are used verbatim.
    #[arg(long)]
    receipt: String,
    #[command(flatten)]
    signature: SignatureSource,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Returns whether the signature is valid. Errors mean the inputs could not
/// be read or decoded.
pub fn run(args: VerifyArgs) -> Result<bool, Box<dyn std::error::Error>> {
    let public_key = match (args.key.public_key, args.key.public_key_file) {
        (Some(key), _) => key,
        (None, Some(path)) => read_text(&path, "public key")?,
        (None, None) => return Err("missing public key".into()),
    };
    let signature = match (args.signature.signature, args.signature.signature_file) {
        (Some(signature), _) => signature,
        (None, Some(path)) => read_text(&path, "signature")?,
        (None, None) => return Err("missing signature".into()),
    };
    let receipt = read_receipt(&args.receipt)?;

    let verifier = ReceiptVerifier::from_base64(&public_key)?;
    let valid = verifier.verify(&receipt, &signature)?;

    let digest = ReceiptDigest::of(&receipt);
    if args.json {
        println!("{}", output::format_verdict_json(valid, &digest));
    } else {
        println!("{}", output::format_verdict(valid, &digest));
    }

    Ok(valid)
}

fn read_receipt(source: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut receipt = Vec::new();
    if source == "-" {
        std::io::stdin()
            .read_to_end(&mut receipt)
            .map_err(|e| format!("Failed to read receipt from stdin: {}", e))?;
    } else {
        receipt = fs::read(source).map_err(|e| format!("Failed to read receipt {}: {}", source, e))?;
    }
    Ok(receipt)
}

/// Reads a base64 value from a file. Surrounding whitespace, such as the
/// trailing newline editors add, is removed; the decoder itself stays strict.
fn read_text(path: &Path, what: &str) -> Result<String, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {} {}: {}", what, path.display(), e))?;
    Ok(text.trim().to_string())
}
