//! Base62 encoding between numeric identifiers and short codes.
//!
//! Codes are positional radix-62 numbers over `0-9A-Za-z`, most significant
//! digit first. Every identifier has exactly one canonical code, so codes
//! derived from unique identifiers never collide.

/// Digit alphabet, in digit-value order.
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const RADIX: u64 = ALPHABET.len() as u64;

/// Length of the code for `u64::MAX`; no valid code is longer.
pub const MAX_CODE_LEN: usize = 11;

/// Codes shadowed by fixed top-level routes. Never handed out.
pub const RESERVED_CODES: &[&str] = &["health"];

/// Returns true if `code` collides with a fixed route.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Reasons a string is not a valid short code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeError {
    #[error("Short code is empty")]
    Empty,

    #[error("Invalid character '{ch}' at position {position}")]
    InvalidCharacter { ch: char, position: usize },

    #[error("Short code has a leading zero digit")]
    NonCanonical,

    #[error("Short code exceeds the identifier range")]
    Overflow,

    #[error("Short code decodes to the reserved identifier 0")]
    Zero,
}

/// Encodes an identifier as a base62 short code.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(encode(61), "z");
/// assert_eq!(encode(62), "10");
/// ```
pub fn encode(id: u64) -> String {
    if id == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::with_capacity(MAX_CODE_LEN);
    let mut rest = id;
    while rest > 0 {
        digits.push(ALPHABET[(rest % RADIX) as usize]);
        rest /= RADIX;
    }
    digits.reverse();

    // Alphabet is ASCII
    digits.into_iter().map(char::from).collect()
}

/// Decodes a short code back into its identifier.
///
/// # Errors
///
/// - [`CodeError::Empty`] for an empty string
/// - [`CodeError::InvalidCharacter`] for characters outside [`ALPHABET`]
/// - [`CodeError::NonCanonical`] for codes with a leading `0` digit
/// - [`CodeError::Overflow`] for values above `u64::MAX`
/// - [`CodeError::Zero`] for `"0"`, since 0 is never allocated
pub fn decode(code: &str) -> Result<u64, CodeError> {
    if code.is_empty() {
        return Err(CodeError::Empty);
    }

    let mut value: u64 = 0;
    for (position, ch) in code.chars().enumerate() {
        let digit = digit_value(ch).ok_or(CodeError::InvalidCharacter { ch, position })?;

        if position == 0 && digit == 0 && code.len() > 1 {
            return Err(CodeError::NonCanonical);
        }

        value = value
            .checked_mul(RADIX)
            .and_then(|v| v.checked_add(digit))
            .ok_or(CodeError::Overflow)?;
    }

    if value == 0 {
        return Err(CodeError::Zero);
    }

    Ok(value)
}

fn digit_value(ch: char) -> Option<u64> {
    match ch {
        '0'..='9' => Some(ch as u64 - '0' as u64),
        'A'..='Z' => Some(ch as u64 - 'A' as u64 + 10),
        'a'..='z' => Some(ch as u64 - 'a' as u64 + 36),
        _ => None,
    }
}
