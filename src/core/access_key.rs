//! Access-key generation and validation.
//!
//! The access key is the 44-digit national identifier of an NFe/NFC-e:
//! 43 fixed-width data digits followed by a modulo-11 check digit.
//!
//! Layout: cUF (2) · AAMM (4) · CNPJ (14) · modelo (2) · série (3) ·
//! nNF (9) · tpEmis (1) · cNF (8) · cDV (1).

use chrono::{DateTime, FixedOffset};
use rand::Rng;

use super::error::NfceError;

/// Document model code for NFC-e (modelo 65).
pub const MODEL_NFCE: &str = "65";

/// Normal emission (tpEmis 1).
pub const EMISSION_NORMAL: u8 = 1;

/// Modulo-11 weight applied to each of the 43 data digits, left to right.
/// This is the 2..9 cycle anchored at the rightmost digit.
const WEIGHTS: [u32; 43] = [
    4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2, 9, 8, 7, 6,
    5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2,
];

/// Compute the check digit over a 43-digit data string.
///
/// Returns `None` unless `data` is exactly 43 ASCII digits.
pub fn check_digit(data: &str) -> Option<u8> {
    if data.len() != 43 || !data.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let sum: u32 = data
        .bytes()
        .zip(WEIGHTS)
        .map(|(b, weight)| u32::from(b - b'0') * weight)
        .sum();
    let remainder = sum % 11;
    if remainder < 2 {
        Some(0)
    } else {
        Some((11 - remainder) as u8)
    }
}

/// Generate a full 44-digit access key from its header fields.
///
/// Fields are zero-padded to their fixed widths; inputs that would
/// overflow a field are rejected rather than silently widening the key.
#[allow(clippy::too_many_arguments)]
pub fn generate(
    state_code: u8,
    issued_at: DateTime<FixedOffset>,
    issuer_cnpj: &str,
    model: &str,
    series: u16,
    number: u32,
    emission_type: u8,
    control_code: u32,
) -> Result<String, NfceError> {
    if issuer_cnpj.len() != 14 || !issuer_cnpj.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NfceError::InvalidInput(format!(
            "issuer CNPJ must be exactly 14 digits, got {issuer_cnpj:?}"
        )));
    }
    if state_code > 99 {
        return Err(NfceError::InvalidInput(format!(
            "state code {state_code} does not fit 2 digits"
        )));
    }
    if model.len() != 2 || !model.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NfceError::InvalidInput(format!(
            "document model must be 2 digits, got {model:?}"
        )));
    }
    if series == 0 || series > 999 {
        return Err(NfceError::InvalidInput(format!(
            "series must be between 1 and 999, got {series}"
        )));
    }
    if number == 0 || number > 999_999_999 {
        return Err(NfceError::InvalidInput(format!(
            "document number must be between 1 and 999999999, got {number}"
        )));
    }
    if !(1..=9).contains(&emission_type) {
        return Err(NfceError::InvalidInput(format!(
            "emission type must be a single digit from 1 to 9, got {emission_type}"
        )));
    }
    if control_code > 99_999_999 {
        return Err(NfceError::InvalidInput(format!(
            "control code {control_code} does not fit 8 digits"
        )));
    }

    let mut key = String::with_capacity(44);
    key.push_str(&format!("{state_code:02}"));
    key.push_str(&issued_at.format("%y%m").to_string());
    key.push_str(issuer_cnpj);
    key.push_str(model);
    key.push_str(&format!("{series:03}"));
    key.push_str(&format!("{number:09}"));
    key.push_str(&emission_type.to_string());
    key.push_str(&format!("{control_code:08}"));

    let verifier = check_digit(&key)
        .ok_or_else(|| NfceError::InvalidInput("malformed key data digits".into()))?;
    key.push((b'0' + verifier) as char);
    Ok(key)
}

/// Generate an NFC-e access key (modelo 65), drawing the 8-digit control
/// code uniformly from `[10000000, 99999999)`.
///
/// The random draw is not checked against already-issued keys; the store
/// enforcing key uniqueness is the backstop for the rare collision.
pub fn generate_nfce(
    state_code: u8,
    issued_at: DateTime<FixedOffset>,
    issuer_cnpj: &str,
    series: u16,
    number: u32,
    emission_type: u8,
) -> Result<String, NfceError> {
    let control_code = rand::thread_rng().gen_range(10_000_000..99_999_999);
    generate(
        state_code,
        issued_at,
        issuer_cnpj,
        MODEL_NFCE,
        series,
        number,
        emission_type,
        control_code,
    )
}

/// Validate a complete access key. Fails closed: any key that is not
/// exactly 44 ASCII digits with a matching check digit is simply invalid,
/// never an error.
pub fn validate(key: &str) -> bool {
    if key.len() != 44 || !key.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    match check_digit(&key[..43]) {
        Some(expected) => key.as_bytes()[43] - b'0' == expected,
        None => false,
    }
}

/// Format a key for display, inserting a space every 4 digits.
///
/// Anything that is not 44 characters long passes through unchanged.
/// Display only — never feed the result back into [`validate`] or storage.
pub fn format(key: &str) -> String {
    if key.len() != 44 {
        return key.to_string();
    }
    let mut formatted = String::with_capacity(55);
    for (i, c) in key.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            formatted.push(' ');
        }
        formatted.push(c);
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn issued_at() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-03-15T10:30:00-03:00").unwrap()
    }

    #[test]
    fn generates_expected_layout() {
        let key = generate(35, issued_at(), "12345678000199", "65", 1, 1, 1, 10_000_000).unwrap();
        assert_eq!(key.len(), 44);
        assert!(key.starts_with("3524031234567800019965001000000001110000000"));
        assert!(validate(&key));
    }

    #[test]
    fn check_digit_is_deterministic() {
        let data = "3524031234567800019965001000000001110000000";
        let first = check_digit(data).unwrap();
        let second = check_digit(data).unwrap();
        assert_eq!(first, second);
        assert!(first <= 9);
    }

    #[test]
    fn check_digit_rejects_wrong_shapes() {
        assert_eq!(check_digit("123"), None);
        assert_eq!(check_digit(&"1".repeat(44)), None);
        assert_eq!(check_digit(&format!("{}A", "1".repeat(42))), None);
    }

    #[test]
    fn nfce_key_embeds_model_65_and_random_control_code() {
        let key = generate_nfce(35, issued_at(), "12345678000199", 1, 42, EMISSION_NORMAL).unwrap();
        assert_eq!(&key[20..22], "65");
        assert_eq!(&key[22..25], "001");
        assert_eq!(&key[25..34], "000000042");
        let control: u32 = key[35..43].parse().unwrap();
        assert!((10_000_000..99_999_999).contains(&control));
        assert!(validate(&key));
    }

    #[test]
    fn validate_fails_closed() {
        assert!(!validate(""));
        assert!(!validate("123"));
        assert!(!validate(&"1".repeat(43)));
        assert!(!validate(&"1".repeat(45)));
        assert!(!validate(&format!("{}X", "1".repeat(43))));

        let key = generate(35, issued_at(), "12345678000199", "65", 1, 1, 1, 10_000_000).unwrap();
        // Corrupt the check digit
        let mut corrupted = key[..43].to_string();
        let dv = key.as_bytes()[43] - b'0';
        corrupted.push((b'0' + (dv + 1) % 10) as char);
        assert!(!validate(&corrupted));
    }

    #[test]
    fn rejects_invalid_inputs() {
        let at = issued_at();
        assert!(generate(35, at, "123", "65", 1, 1, 1, 10_000_000).is_err());
        assert!(generate(35, at, "1234567800019A", "65", 1, 1, 1, 10_000_000).is_err());
        assert!(generate(35, at, "12345678000199", "65", 0, 1, 1, 10_000_000).is_err());
        assert!(generate(35, at, "12345678000199", "65", 1000, 1, 1, 10_000_000).is_err());
        assert!(generate(35, at, "12345678000199", "65", 1, 0, 1, 10_000_000).is_err());
        assert!(generate(35, at, "12345678000199", "65", 1, 1_000_000_000, 1, 10_000_000).is_err());
        assert!(generate(35, at, "12345678000199", "65", 1, 1, 0, 10_000_000).is_err());
        assert!(generate(35, at, "12345678000199", "65", 1, 1, 1, 100_000_000).is_err());
    }

    #[test]
    fn format_groups_of_four() {
        let key = generate(35, issued_at(), "12345678000199", "65", 1, 1, 1, 10_000_000).unwrap();
        let formatted = format(&key);
        assert_eq!(formatted.matches(' ').count(), 10);
        assert_eq!(formatted.split(' ').count(), 11);
        assert!(formatted.split(' ').all(|group| group.len() == 4));
        assert_eq!(formatted.replace(' ', ""), key);
    }

    #[test]
    fn format_passes_through_odd_lengths() {
        assert_eq!(format("123"), "123");
        assert_eq!(format(""), "");
    }
}
