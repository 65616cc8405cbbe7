//! Input validation for catalog requests.
//!
//! These checks run before any table is touched, so a rejected request never
//! leaves a partial mutation behind.

use crate::error::ValidationError;

/// Derive a key from a value when the caller did not supply one.
///
/// The value is split on single spaces and every token is capitalized: its
/// first character is upper-cased and the rest kept as is. Tokens are then
/// joined without a separator, so `"hello world"` becomes `"HelloWorld"`.
pub fn derive_key(value: &str) -> String {
    value
        .split(' ')
        .map(|token| {
            let mut chars = token.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Resolve the key for a new entry: the supplied key if non-empty, otherwise
/// one derived from `value`.
pub fn resolve_new_key(key: Option<&str>, value: &str) -> Result<String, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyValue);
    }

    let key = match key.filter(|k| !k.is_empty()) {
        Some(key) => key.to_string(),
        None => derive_key(value),
    };

    if key.is_empty() {
        return Err(ValidationError::EmptyKey);
    }
    Ok(key)
}

/// Reject an empty key.
pub fn require_key(key: &str) -> Result<&str, ValidationError> {
    if key.is_empty() {
        Err(ValidationError::EmptyKey)
    } else {
        Ok(key)
    }
}
