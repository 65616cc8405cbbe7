//! Read-only, paginated view of the catalog.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::Catalog;
use crate::i18n::LanguageCode;

/// Maximum number of keys returned by one listing.
pub const PAGE_SIZE: usize = 250;

/// Keys with their value in every returned language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    /// Returned languages, base language first.
    #[serde(rename = "langs")]
    pub languages: Vec<LanguageCode>,

    /// key → language code → value (empty when the language lacks the key)
    #[serde(rename = "strings")]
    pub entries: BTreeMap<String, BTreeMap<String, String>>,

    #[serde(rename = "showTranslations")]
    pub show_translations: bool,
}

/// List keys across all languages.
///
/// With a non-empty `query`, only keys whose name or base-language value
/// contains it (ignoring case) are kept. Keys are sorted and cut off after
/// [`PAGE_SIZE`]. Only the base language is returned unless
/// `show_translations` is set.
pub fn list_strings(catalog: &Catalog, query: Option<&str>, show_translations: bool) -> Listing {
    let needle = query.map(str::to_lowercase).filter(|q| !q.is_empty());
    let base = catalog.base_table();

    let keys: BTreeSet<&str> = catalog.tables().flat_map(|(_, table)| table.keys()).collect();
    let keys = keys.into_iter().filter(|key| match &needle {
        Some(needle) => {
            key.to_lowercase().contains(needle.as_str())
                || base.get(key).unwrap_or("").to_lowercase().contains(needle.as_str())
        }
        None => true,
    });

    let languages = if show_translations {
        catalog.languages()
    } else {
        vec![LanguageCode::base()]
    };

    let entries = keys
        .take(PAGE_SIZE)
        .map(|key| {
            let values = languages
                .iter()
                .map(|code| {
                    let value = catalog.table(code).and_then(|t| t.get(key)).unwrap_or("");
                    (code.to_string(), value.to_string())
                })
                .collect();
            (key.to_string(), values)
        })
        .collect();

    Listing {
        languages,
        entries,
        show_translations,
    }
}
