//! Language type: validated language code.
//!
//! Codes double as file-name suffixes (`messages_fr.properties`), so only a
//! conservative shape is accepted: two or three lowercase letters, optionally
//! followed by `_` and a short region or script tag (e.g. `pt_BR`).

use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

use crate::error::ValidationError;

/// Code of the base language every other table is derived from.
pub const BASE_LANGUAGE: &str = "en";

static CODE_REGEX: OnceLock<Regex> = OnceLock::new();

fn code_regex() -> &'static Regex {
    CODE_REGEX.get_or_init(|| {
        Regex::new(r"^[a-z]{2,3}(?:_[A-Za-z0-9]{2,8})?$").expect("language code pattern is valid")
    })
}

/// A validated language code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Parse a language code.
    ///
    /// # Returns
    /// * `Some(LanguageCode)` if `code` has the accepted shape
    /// * `None` otherwise
    pub fn parse(code: &str) -> Option<LanguageCode> {
        code_regex()
            .is_match(code)
            .then(|| LanguageCode(code.to_string()))
    }

    /// The base language (`en`).
    pub fn base() -> LanguageCode {
        LanguageCode(BASE_LANGUAGE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_base(&self) -> bool {
        self.0 == BASE_LANGUAGE
    }
}

impl TryFrom<&str> for LanguageCode {
    type Error = ValidationError;

    fn try_from(code: &str) -> Result<Self, Self::Error> {
        LanguageCode::parse(code).ok_or_else(|| ValidationError::UnknownLanguage(code.to_string()))
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for LanguageCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
