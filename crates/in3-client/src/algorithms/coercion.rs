//! # Type Coercion
//!
//! Converts wire scalars into domain-typed values.
//!
//! Integers arrive either as JSON numbers or as strings. Strings may be
//! decimal or `0x`-prefixed hex. Deposits routinely exceed 64 bits, so the
//! big-integer path never goes through a machine word.

use primitive_types::U256;
use serde_json::Value;

use crate::domain::Account;

/// Parse a decimal or `0x`-prefixed hex string into a `u64`.
pub fn parse_u64(raw: &str) -> Result<u64, String> {
    let raw = raw.trim();
    match strip_hex_prefix(raw) {
        Some(digits) => {
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err("invalid hex integer".to_string());
            }
            u64::from_str_radix(digits, 16).map_err(|e| format!("invalid hex integer: {e}"))
        }
        None => {
            if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
                return Err("invalid decimal integer".to_string());
            }
            raw.parse::<u64>()
                .map_err(|e| format!("invalid decimal integer: {e}"))
        }
    }
}

/// Parse a decimal or `0x`-prefixed hex string into a `U256`.
pub fn parse_u256(raw: &str) -> Result<U256, String> {
    let raw = raw.trim();
    match strip_hex_prefix(raw) {
        Some(digits) => {
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err("invalid hex integer".to_string());
            }
            let significant = digits.trim_start_matches('0');
            if significant.is_empty() {
                return Ok(U256::zero());
            }
            if significant.len() > 64 {
                return Err("integer exceeds 256 bits".to_string());
            }
            U256::from_str_radix(significant, 16)
                .map_err(|e| format!("invalid hex integer: {e:?}"))
        }
        None => {
            if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
                return Err("invalid decimal integer".to_string());
            }
            U256::from_dec_str(raw).map_err(|e| format!("invalid decimal integer: {e:?}"))
        }
    }
}

/// Coerce a wire value to text.
///
/// Strings pass through; numbers and booleans are rendered.
pub fn to_text(value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err("expected a string".to_string()),
    }
}

/// Coerce a wire value to a `u64`.
pub fn to_u64(value: &Value) -> Result<u64, String> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| "expected an unsigned 64-bit integer".to_string()),
        Value::String(s) => parse_u64(s),
        _ => Err("expected an integer".to_string()),
    }
}

/// Coerce a wire value to a `U256`.
///
/// JSON numbers wider than 64 bits are read from their literal digits.
pub fn to_u256(value: &Value) -> Result<U256, String> {
    match value {
        Value::Number(n) => match n.as_u64() {
            Some(small) => Ok(U256::from(small)),
            None => parse_u256(&n.to_string()),
        },
        Value::String(s) => parse_u256(s),
        _ => Err("expected an integer".to_string()),
    }
}

/// Coerce a wire value to an [`Account`].
pub fn to_account(value: &Value) -> Result<Account, String> {
    match value {
        Value::String(s) => s.parse::<Account>().map_err(|e| e.to_string()),
        _ => Err("expected an account id string".to_string()),
    }
}

fn strip_hex_prefix(raw: &str) -> Option<&str> {
    raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X"))
}
