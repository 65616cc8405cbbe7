use std::path::PathBuf;
use thiserror::Error;

use crate::properties::ParseError;

/// Caller-supplied input that violates a precondition of a catalog operation.
///
/// The message is meant to be shown back to whoever sent the request, so it
/// names the offending field or value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("value cannot be empty")]
    EmptyValue,

    #[error("key cannot be empty")]
    EmptyKey,

    #[error("key and lang are required")]
    MissingLanguage,

    #[error("language not found: '{0}'")]
    UnknownLanguage(String),

    #[error("key already exists: '{0}'")]
    DuplicateKey(String),
}

/// Errors raised by the catalog and its storage.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("could not decode {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("could not write {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    /// Whether the error was caused by the caller's input rather than the system.
    pub fn is_validation(&self) -> bool {
        matches!(self, CatalogError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_name_the_input() {
        assert_eq!(
            ValidationError::DuplicateKey("Greeting".to_string()).to_string(),
            "key already exists: 'Greeting'"
        );
        assert_eq!(
            ValidationError::UnknownLanguage("xx".to_string()).to_string(),
            "language not found: 'xx'"
        );
    }

    #[test]
    fn test_validation_converts_into_catalog_error() {
        let err: CatalogError = ValidationError::EmptyKey.into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "key cannot be empty");
    }

    #[test]
    fn test_persistence_error_is_not_validation() {
        let err = CatalogError::Persistence {
            path: PathBuf::from("resources/messages.properties"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(!err.is_validation());
        assert!(err.to_string().contains("messages.properties"));
    }
}
