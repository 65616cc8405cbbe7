//! Shared handle over the catalog and display settings.
//!
//! Each mutation holds the catalog write lock from validation through the
//! last file write, so readers only ever see fully applied changes.

use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::CatalogError;
use crate::listing::{list_strings, Listing};

pub struct StringService {
    catalog: RwLock<Catalog>,
    config: RwLock<Config>,
    config_path: Option<PathBuf>,
}

impl StringService {
    pub fn new(catalog: Catalog, config: Config) -> Self {
        Self {
            catalog: RwLock::new(catalog),
            config: RwLock::new(config),
            config_path: None,
        }
    }

    /// Persist display setting changes to `path`.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub async fn show_translations(&self) -> bool {
        self.config.read().await.show_translations
    }

    pub async fn list_strings(&self, query: Option<&str>) -> Listing {
        let show_translations = self.show_translations().await;
        let catalog = self.catalog.read().await;
        list_strings(&catalog, query, show_translations)
    }

    pub async fn add_string(&self, key: Option<&str>, value: &str) -> Result<String, CatalogError> {
        self.catalog.write().await.add_key(key, value)
    }

    pub async fn edit_string(&self, key: &str, value: &str, language: &str) -> Result<(), CatalogError> {
        self.catalog.write().await.edit_key(key, value, language)
    }

    pub async fn remove_string(&self, key: &str) -> Result<(), CatalogError> {
        self.catalog.write().await.remove_key(key)
    }

    /// Toggle whether listings include non-base languages.
    ///
    /// Only this setting is written to the attached config file. A failed
    /// write is logged and the new setting stays in effect.
    pub async fn set_show_translations(&self, show: bool) {
        let mut config = self.config.write().await;
        config.show_translations = show;
        info!("Show translations set to {}", show);

        if let Some(path) = &self.config_path {
            if let Err(e) = Config::save_show_translations(path, show) {
                warn!("Could not save config: {:#}", e);
            }
        }
    }
}
