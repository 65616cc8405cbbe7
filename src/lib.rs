//! Pseudo-localization for `.properties` message catalogs.
//!
//! A catalog is one base-language string table plus one table per other
//! language, each stored in its own properties file. Adding or editing a base
//! string fills every other language with a placeholder translation padded to
//! that language's expected length, so layouts can be checked for overflow
//! before real translations exist.

pub mod catalog;
pub mod config;
pub mod error;
pub mod i18n;
pub mod listing;
pub mod properties;
pub mod server;
pub mod service;
pub mod storage;
