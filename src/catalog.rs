//! The language table set: every language's string table, kept in sync with
//! the base language and written through to disk after each mutation.

use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};

use crate::error::{CatalogError, ValidationError};
use crate::i18n::{
    placeholder_translate, require_key, resolve_new_key, LanguageCode, LengthMultipliers,
};
use crate::properties::StringTable;
use crate::storage::ResourceLayout;

/// In-memory tables for all languages of one storage directory.
///
/// The base language table always exists. Its key set is canonical: after
/// any mutation every other table holds every base key.
#[derive(Debug, Clone)]
pub struct Catalog {
    layout: ResourceLayout,
    multipliers: LengthMultipliers,
    tables: BTreeMap<LanguageCode, StringTable>,
}

impl Catalog {
    /// Build a catalog from tables already in memory. Nothing is written.
    pub fn with_tables(
        layout: ResourceLayout,
        multipliers: LengthMultipliers,
        tables: impl IntoIterator<Item = (LanguageCode, StringTable)>,
    ) -> Self {
        let mut tables: BTreeMap<_, _> = tables.into_iter().collect();
        tables.entry(LanguageCode::base()).or_default();
        Self {
            layout,
            multipliers,
            tables,
        }
    }

    /// Load every table file found in the layout's directory.
    ///
    /// Files that cannot be read or decoded are skipped with a warning. When
    /// no table file exists at all, an empty base table is created and
    /// written immediately.
    pub fn load(layout: ResourceLayout, multipliers: LengthMultipliers) -> Result<Self, CatalogError> {
        let files = layout.discover()?;

        if files.is_empty() {
            info!(
                "No properties files found in {}, creating empty '{}'",
                layout.dir().display(),
                layout.plain_file_name()
            );
            let catalog = Self::with_tables(layout, multipliers, []);
            let _ = catalog.flush();
            return Ok(catalog);
        }

        let mut tables = BTreeMap::new();
        for file in files {
            let table = match layout.read_table(&file.path) {
                Ok(table) => table,
                Err(e) => {
                    warn!("Could not load {}: {}. Skipping.", file.path.display(), e);
                    continue;
                }
            };
            debug!(
                "Loaded {} entries for '{}' from {}",
                table.len(),
                file.language,
                file.path.display()
            );
            // Files are sorted, so <stem>_en.properties replaces <stem>.properties.
            if tables.insert(file.language.clone(), table).is_some() && file.suffixed {
                warn!(
                    "{} takes precedence over {} for '{}'",
                    file.path.display(),
                    layout.plain_file_name(),
                    file.language
                );
            }
        }

        Ok(Self::with_tables(layout, multipliers, tables))
    }

    pub fn table(&self, code: &LanguageCode) -> Option<&StringTable> {
        self.tables.get(code)
    }

    pub fn base_table(&self) -> &StringTable {
        static EMPTY: StringTable = StringTable::new();
        self.tables.get(&LanguageCode::base()).unwrap_or(&EMPTY)
    }

    /// All tables ordered by language code.
    pub fn tables(&self) -> impl Iterator<Item = (&LanguageCode, &StringTable)> {
        self.tables.iter()
    }

    /// Known languages, base language first and the rest in ascending order.
    pub fn languages(&self) -> Vec<LanguageCode> {
        let base = LanguageCode::base();
        std::iter::once(base.clone())
            .chain(self.tables.keys().filter(|code| **code != base).cloned())
            .collect()
    }

    /// Resolve a caller-supplied language code against the loaded tables.
    pub fn resolve_language(&self, language: &str) -> Result<LanguageCode, ValidationError> {
        LanguageCode::parse(language)
            .filter(|code| self.tables.contains_key(code))
            .ok_or_else(|| ValidationError::UnknownLanguage(language.to_string()))
    }

    // ==================== Mutations ====================

    /// Add a new key to every language and return it.
    ///
    /// When `key` is empty it is derived from `value`. The base table gets
    /// `value` itself; every other table gets its placeholder translation.
    pub fn add_key(&mut self, key: Option<&str>, value: &str) -> Result<String, CatalogError> {
        let key = resolve_new_key(key, value)?;
        if self.base_table().contains_key(&key) {
            return Err(ValidationError::DuplicateKey(key).into());
        }

        for (code, table) in self.tables.iter_mut() {
            let stored = if code.is_base() {
                value.to_string()
            } else {
                placeholder_translate(value, code.as_str(), &self.multipliers)
            };
            table.insert(key.clone(), stored);
        }

        info!("Added '{}' to {} languages", key, self.tables.len());
        self.write_through();
        Ok(key)
    }

    /// Set the value of `key` in `language`.
    ///
    /// A base-language edit stores `value` verbatim and regenerates the
    /// placeholders of every other language. Any other language stores the
    /// placeholder translation of `value`, never the raw text.
    pub fn edit_key(&mut self, key: &str, value: &str, language: &str) -> Result<(), CatalogError> {
        let key = require_key(key)?;
        if language.is_empty() {
            return Err(ValidationError::MissingLanguage.into());
        }
        let target = self.resolve_language(language)?;

        for (code, table) in self.tables.iter_mut() {
            if code.is_base() && target.is_base() {
                table.insert(key, value);
            } else if target.is_base() || *code == target {
                table.insert(key, placeholder_translate(value, code.as_str(), &self.multipliers));
            }
        }

        info!("Edited '{}' in '{}'", key, target);
        self.write_through();
        Ok(())
    }

    /// Remove `key` from every language. Languages without the key are left
    /// as they are.
    pub fn remove_key(&mut self, key: &str) -> Result<(), CatalogError> {
        let key = require_key(key)?;

        let removed = self
            .tables
            .values_mut()
            .filter_map(|table| table.remove(key))
            .count();

        info!("Removed '{}' from {} languages", key, removed);
        self.write_through();
        Ok(())
    }

    // ==================== Persistence ====================

    /// Write every table to disk.
    ///
    /// All tables are attempted even if one fails; each failure is logged and
    /// the first one is returned.
    pub fn flush(&self) -> Result<(), CatalogError> {
        let mut first_error = None;
        for (code, table) in &self.tables {
            match self.layout.write_table(code, table) {
                Ok(path) => debug!("Wrote {} entries to {}", table.len(), path.display()),
                Err(e) => {
                    error!("Error writing properties for '{}': {}", code, e);
                    first_error.get_or_insert(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Fill in missing base keys, then flush.
    ///
    /// Write failures are logged by `flush` and leave the in-memory change in
    /// place.
    fn write_through(&mut self) {
        self.fill_missing_keys();
        let _ = self.flush();
    }

    /// Give every non-base table a placeholder for base keys it lacks.
    fn fill_missing_keys(&mut self) {
        let Some(base) = self.tables.get(&LanguageCode::base()) else {
            return;
        };

        let mut missing = Vec::new();
        for (code, table) in self.tables.iter().filter(|(code, _)| !code.is_base()) {
            for (key, value) in base.iter().filter(|(key, _)| !table.contains_key(key)) {
                let stored = placeholder_translate(value, code.as_str(), &self.multipliers);
                missing.push((code.clone(), key.to_string(), stored));
            }
        }

        if !missing.is_empty() {
            debug!("Synthesizing {} missing placeholders", missing.len());
        }
        for (code, key, stored) in missing {
            if let Some(table) = self.tables.get_mut(&code) {
                table.insert(key, stored);
            }
        }
    }
}
