#![forbid(unsafe_code)]

//! Runtime-switchable translation lookup.
//!
//! Translations are registered in a [`TranslationStore`] as
//! [`TranslationEntry`] records keyed by `(namespace, key)`. A
//! [`CultureContext`] owns a store plus the active culture and broadcasts
//! culture changes to subscribers. [`LocalizedValue`] handles subscribe to
//! their context and re-resolve their text when the culture changes, so UI
//! code can hold a value and always read the current-language text.
//!
//! Missing data never panics: lookups degrade to placeholder strings such as
//! `"#INVALID LOCALIZATION KEY#"`, and a missing culture falls back to the
//! fallback culture's text prefixed with `#`.

pub mod config;
pub mod context;
pub mod culture;
pub mod entry;
pub mod enums;
pub mod error;
pub mod format;
pub mod global;
pub mod store;
pub mod value;

pub use config::{ConfigError, CultureConfig, CultureConfigParse};
pub use context::{CultureChange, CultureContext, CultureObserver, SubscriptionId};
pub use culture::{CultureCode, CultureMatching, Language};
pub use entry::{Identifier, TranslationEntry};
pub use enums::{EnumTable, INVALID_ENUM_TEXT, LocalizedEnum, LocalizedEnumCache};
pub use error::{
    INVALID_KEY_TEXT, INVALID_NAMESPACE_TEXT, LocaleError, MISSING_FALLBACK_TEXT, Resolution,
    ResolveError, Resolved,
};
pub use format::format_positional;
pub use store::{CoverageReport, CultureCoverage, TranslationStore};
pub use value::{LocalizedValue, TextSubscription, ValueKind};
