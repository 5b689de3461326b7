//! Internationalization (i18n) module for localized validation messages.
//!
//! # Architecture
//!
//! - `locale`: Validated locale identifiers and their fallback chains
//! - `catalog`: Locale-keyed translation tables loaded from JSON, and the
//!   `Translator` interface the message resolver consumes
//! - `audit`: Startup checks of a rule table against a catalog
//! - `metrics`: Counters for how messages were resolved
//!
//! # Example
//!
//! ```rust,ignore
//! use localized_validations::i18n::{Catalog, Locale, Translator};
//!
//! let mut catalog = Catalog::new(Locale::parse("en")?);
//! catalog.load_dir("config/locales")?;
//!
//! let view = catalog.localized(&Locale::parse("pt-BR")?);
//! let message = view.lookup("errors.messages.presence");
//! ```

mod audit;
mod catalog;
mod locale;
mod metrics;

pub use audit::{audit, audit_defaults, AuditReport};
pub use catalog::{interpolate, placeholders, Catalog, LocalizedCatalog, Translator};
pub use locale::Locale;
pub use metrics::{MetricsReport, ResolutionMetrics};
