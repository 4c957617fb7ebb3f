use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use sha1::{Digest, Sha1};

use super::money::format_scaled;
use super::types::Environment;

/// Builds the consultation URL embedded in the printed QR code.
///
/// The payload is pipe-delimited: access key, environment code, issue
/// timestamp (`yyyyMMddHHmmss`), grand total with the decimal point
/// removed, and — when the consumer identified themselves — an uppercase
/// SHA-1 digest of their tax id. The whole payload travels Base64-encoded
/// in the `p` query parameter.
#[derive(Debug, Clone)]
pub struct QrCodeBuilder {
    base_url: String,
}

impl QrCodeBuilder {
    /// Create a builder for the given SEFAZ consultation base URL.
    pub fn new(consultation_base_url: impl Into<String>) -> Self {
        Self {
            base_url: consultation_base_url.into(),
        }
    }

    /// Build the consultation URL for a document.
    pub fn consultation_url(
        &self,
        access_key: &str,
        environment: Environment,
        issued_at: DateTime<FixedOffset>,
        total: Decimal,
        recipient_tax_id: Option<&str>,
    ) -> String {
        let mut payload = String::new();
        payload.push_str(access_key);
        payload.push('|');
        payload.push_str(&environment.code().to_string());
        payload.push('|');
        payload.push_str(&issued_at.format("%Y%m%d%H%M%S").to_string());
        payload.push('|');
        payload.push_str(&format_scaled(total, 2).replace('.', ""));
        payload.push('|');

        if let Some(tax_id) = recipient_tax_id {
            if !tax_id.trim().is_empty() {
                payload.push_str(&sha1_hex_upper(tax_id));
            }
        }

        format!("{}?p={}", self.base_url, STANDARD.encode(payload.as_bytes()))
    }

    /// Check that a consultation URL carries a payload for the expected
    /// access key. Fails closed on any malformed input.
    pub fn validate_payload(url: &str, expected_access_key: &str) -> bool {
        let Some(index) = url.find("?p=") else {
            return false;
        };
        let Ok(decoded) = STANDARD.decode(&url[index + 3..]) else {
            return false;
        };
        let Ok(payload) = String::from_utf8(decoded) else {
            return false;
        };
        let fields: Vec<&str> = payload.split('|').collect();
        fields.len() >= 4 && fields[0] == expected_access_key
    }
}

/// Uppercase hex SHA-1 digest, as SEFAZ expects for the consumer id hash.
fn sha1_hex_upper(text: &str) -> String {
    Sha1::digest(text.as_bytes())
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect()
}
