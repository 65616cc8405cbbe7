//! Language handling for the string catalog.
//!
//! # Architecture
//!
//! - `language`: Validated language codes and the base language
//! - `registry`: Per-language length multipliers
//! - `pseudo`: Placeholder translation generator
//! - `validator`: Request validation and key derivation
//!
//! # Example
//!
//! ```rust,ignore
//! use pseudo_localizer::i18n::{placeholder_translate, LanguageCode, LengthMultipliers};
//!
//! let fr = LanguageCode::parse("fr").unwrap();
//! let multipliers = LengthMultipliers::new().with("fr", 1.2);
//! let value = placeholder_translate("Hello World", fr.as_str(), &multipliers);
//! assert_eq!(value, "Hello World [fr]");
//! ```

mod language;
mod pseudo;
mod registry;
mod validator;

pub use language::{LanguageCode, BASE_LANGUAGE};
pub use pseudo::placeholder_translate;
pub use registry::{default_multipliers, LengthMultipliers, DEFAULT_MULTIPLIER};
pub use validator::{derive_key, require_key, resolve_new_key};
