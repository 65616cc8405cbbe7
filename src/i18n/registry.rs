//! Length multiplier registry.
//!
//! Each language may declare how much longer its text typically runs than the
//! base language. Placeholder translations are padded to that length so that
//! layout overflow shows up before a real translation exists.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Multiplier used for any language without an explicit entry.
pub const DEFAULT_MULTIPLIER: f64 = 1.1;

/// Per-language length multipliers keyed by language code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LengthMultipliers {
    multipliers: BTreeMap<String, f64>,
}

impl LengthMultipliers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the multiplier for a language, replacing any previous one.
    pub fn with(mut self, code: impl Into<String>, multiplier: f64) -> Self {
        self.multipliers.insert(code.into(), multiplier);
        self
    }

    /// Get the multiplier for a language code.
    ///
    /// # Returns
    /// The configured multiplier, or [`DEFAULT_MULTIPLIER`] when the code has
    /// no entry.
    pub fn for_language(&self, code: &str) -> f64 {
        self.multipliers
            .get(code)
            .copied()
            .unwrap_or(DEFAULT_MULTIPLIER)
    }

    /// All explicitly configured entries, ordered by code.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.multipliers.iter().map(|(code, m)| (code.as_str(), *m))
    }

    pub fn is_empty(&self) -> bool {
        self.multipliers.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for LengthMultipliers {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(LengthMultipliers::new(), |acc, (code, m)| acc.with(code, m))
    }
}

/// Multipliers shipped in a freshly created config file.
pub fn default_multipliers() -> LengthMultipliers {
    LengthMultipliers::new()
        .with("fr", 1.2)
        .with("nl", 1.2)
        .with("fi", 1.1)
        .with("es", 1.25)
        .with("pt", 1.2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_language_configured() {
        let multipliers = default_multipliers();
        assert_eq!(multipliers.for_language("es"), 1.25);
        assert_eq!(multipliers.for_language("fr"), 1.2);
    }

    #[test]
    fn test_for_language_falls_back_to_default() {
        let multipliers = default_multipliers();
        assert_eq!(multipliers.for_language("de"), DEFAULT_MULTIPLIER);
        assert_eq!(LengthMultipliers::new().for_language("fr"), DEFAULT_MULTIPLIER);
    }

    #[test]
    fn test_with_replaces_existing_entry() {
        let multipliers = LengthMultipliers::new().with("fr", 1.2).with("fr", 1.5);
        assert_eq!(multipliers.for_language("fr"), 1.5);
        assert_eq!(multipliers.iter().count(), 1);
    }

    #[test]
    fn test_deserializes_from_json_object() {
        let multipliers: LengthMultipliers =
            serde_json::from_str(r#"{"de": 1.3, "ja": 0.8}"#).expect("Should deserialize");
        assert_eq!(multipliers.for_language("de"), 1.3);
        assert_eq!(multipliers.for_language("ja"), 0.8);
    }

    #[test]
    fn test_serializes_in_code_order() {
        let multipliers: LengthMultipliers = [("nl", 1.2), ("de", 1.3)].into_iter().collect();
        let json = serde_json::to_string(&multipliers).expect("Should serialize");
        assert_eq!(json, r#"{"de":1.3,"nl":1.2}"#);
    }
}
