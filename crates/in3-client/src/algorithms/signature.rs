//! # Signature Validation
//!
//! Syntactic sanity checks applied before anything reaches the ABI codec.
//!
//! The check is deliberately lenient. It looks for a parenthesized group and
//! for at least one recognized primitive type name anywhere in the text. It
//! does not count arguments or check tuple nesting; the codec in the runtime
//! owns the real grammar.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::domain::ValidationError;

/// Primitive type names a signature must mention at least once.
pub const RECOGNIZED_TYPES: [&str; 6] = ["address", "string", "uint", "bool", "bytes", "int"];

/// Hex characters in one ABI word.
pub const ABI_WORD_HEX_LEN: usize = 64;

// Anchored at the start like a match, never a search: `.` stops at newlines.
static SIGNATURE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*(\(.+\))").expect("signature pattern compiles"));

/// Check that a function signature is well-formed enough for the codec.
///
/// Accepts `name(type,...)`, bare tuples `(type,...)`, and either form
/// followed by `:returnTypes`.
pub fn validate_signature(signature: &str) -> Result<(), ValidationError> {
    let is_signature = SIGNATURE_PATTERN.is_match(signature);
    let contains_type = RECOGNIZED_TYPES.iter().any(|t| signature.contains(t));

    if is_signature && contains_type {
        Ok(())
    } else {
        Err(ValidationError::InvalidSignature {
            signature: signature.to_string(),
        })
    }
}

/// Check that an encoded value can hold at least one ABI word past its header.
pub fn validate_encoded_value(encoded: &str) -> Result<(), ValidationError> {
    let payload = encoded
        .strip_prefix("0x")
        .ok_or(ValidationError::MissingHexPrefix)?;

    let length = payload.chars().count();
    if length <= ABI_WORD_HEX_LEN {
        return Err(ValidationError::EncodedValueTooShort { length });
    }
    Ok(())
}

/// A function signature that passed [`validate_signature`].
///
/// The accessors split the text; they apply no stricter grammar.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AbiSignature(String);

impl AbiSignature {
    /// Validate and wrap a signature.
    pub fn parse(signature: &str) -> Result<Self, ValidationError> {
        validate_signature(signature)?;
        Ok(Self(signature.to_string()))
    }

    /// Full signature text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Function name, if the signature is not a bare tuple.
    pub fn function_name(&self) -> Option<&str> {
        let open = self.0.find('(')?;
        let name = self.0[..open].trim();
        (!name.is_empty()).then_some(name)
    }

    /// Parameter list between the outer parentheses.
    pub fn parameters(&self) -> &str {
        let call = self.split_returns().0;
        match (call.find('('), call.rfind(')')) {
            (Some(open), Some(close)) if open < close => &call[open + 1..close],
            _ => "",
        }
    }

    /// Return types after the trailing `:`, if any.
    pub fn return_types(&self) -> Option<&str> {
        self.split_returns().1
    }

    fn split_returns(&self) -> (&str, Option<&str>) {
        let text = self.0.as_str();
        let Some(open) = text.find('(') else {
            return (text, None);
        };

        let mut depth = 0usize;
        for (i, c) in text[open..].char_indices() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        let end = open + i + 1;
                        return match text[end..].strip_prefix(':') {
                            Some(returns) => (&text[..end], Some(returns)),
                            None => (text, None),
                        };
                    }
                }
                _ => {}
            }
        }
        (text, None)
    }
}

impl FromStr for AbiSignature {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for AbiSignature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AbiSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
