//! Output formatting utilities.

use playstore_signature::ReceiptDigest;
use serde::Serialize;
use serde_json::json;

/// Formats a record as pretty JSON.
pub fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a verification result as one human-readable line.
pub fn format_verdict(valid: bool, digest: &ReceiptDigest) -> String {
    let verdict = if valid { "VALID" } else { "INVALID" };
    format!("{:<8} receipt sha1 {}", verdict, digest)
}

/// Formats a verification result as JSON.
pub fn format_verdict_json(valid: bool, digest: &ReceiptDigest) -> String {
    format_json(&json!({
        "valid": valid,
        "receipt_sha1": digest.to_hex(),
    }))
}

/// Formats the confirmation printed after a lifecycle action.
pub fn format_action(action: &str, token: &str) -> String {
    format!("{}: {}", action, truncate(token, 40))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}
