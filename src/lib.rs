//! Localized validation error messages.
//!
//! Failed validation rules resolve their messages through a chain of catalog
//! keys, from the most specific (model, attribute, rule and arguments) to the
//! global rule default, before falling back to the rule's built-in message.

pub mod config;
pub mod error;
pub mod i18n;
pub mod validation;

pub use error::ConfigError;
