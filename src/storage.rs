//! On-disk layout of the per-language properties files.
//!
//! A catalog lives in one directory. The base language is stored in
//! `<stem>.properties`, or in `<stem>_en.properties` when that file exists;
//! every other language in `<stem>_<code>.properties`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::CatalogError;
use crate::i18n::LanguageCode;
use crate::properties::{self, StringTable};

/// File extension of every table file.
pub const EXTENSION: &str = "properties";

/// A table file found in the storage directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub language: LanguageCode,
    pub path: PathBuf,
    /// Whether the name carries an explicit `_<code>` suffix.
    pub suffixed: bool,
}

/// Maps language codes to file names in a storage directory and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLayout {
    dir: PathBuf,
    stem: String,
}

impl ResourceLayout {
    pub fn new(dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            stem: stem.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Language stored in `file_name`, if the name follows the layout.
    ///
    /// `<stem>.properties` maps to the base language.
    pub fn language_of(&self, file_name: &str) -> Option<(LanguageCode, bool)> {
        let name = file_name
            .strip_suffix(EXTENSION)?
            .strip_suffix('.')?
            .strip_prefix(self.stem.as_str())?;

        if name.is_empty() {
            return Some((LanguageCode::base(), false));
        }
        let code = LanguageCode::parse(name.strip_prefix('_')?)?;
        Some((code, true))
    }

    /// `<stem>.properties`
    pub fn plain_file_name(&self) -> String {
        format!("{}.{}", self.stem, EXTENSION)
    }

    /// `<stem>_<code>.properties`
    pub fn suffixed_file_name(&self, code: &LanguageCode) -> String {
        format!("{}_{}.{}", self.stem, code, EXTENSION)
    }

    /// Path a language's table is written to.
    ///
    /// The base language keeps using an existing `<stem>_en.properties`;
    /// otherwise it is written without a suffix.
    pub fn path_for(&self, code: &LanguageCode) -> PathBuf {
        let suffixed = self.dir.join(self.suffixed_file_name(code));
        if code.is_base() && !suffixed.exists() {
            return self.dir.join(self.plain_file_name());
        }
        suffixed
    }

    /// List table files in the storage directory, ordered by file name.
    ///
    /// A missing directory yields no files. Names that do not follow the
    /// layout are ignored.
    pub fn discover(&self) -> Result<Vec<DiscoveredFile>, CatalogError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(CatalogError::Storage {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| CatalogError::Storage {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            match self.language_of(file_name) {
                Some((language, suffixed)) => files.push(DiscoveredFile {
                    language,
                    path,
                    suffixed,
                }),
                None => debug!("Ignoring {} (not a table file)", path.display()),
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    /// Read and decode one table file.
    pub fn read_table(&self, path: &Path) -> Result<StringTable, CatalogError> {
        let bytes = fs::read(path).map_err(|source| CatalogError::Storage {
            path: path.to_path_buf(),
            source,
        })?;
        properties::parse(&bytes).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write one language's table, creating the directory if needed.
    pub fn write_table(
        &self,
        code: &LanguageCode,
        table: &StringTable,
    ) -> Result<PathBuf, CatalogError> {
        let path = self.path_for(code);
        fs::create_dir_all(&self.dir)
            .and_then(|_| fs::write(&path, properties::serialize(table)))
            .map_err(|source| CatalogError::Persistence {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}
