//! Error and classification types.
//!
//! # Failure Modes
//!
//! | Kind | Cause | Behavior |
//! |------|-------|----------|
//! | `NamespaceNotFound` | Namespace absent from store | Placeholder text |
//! | `KeyNotFound` | Key absent in a known namespace | Placeholder text |
//! | `CultureNotFoundFallbackApplied` | Culture absent in entry | `#`-prefixed fallback text |
//! | `FallbackMissing` | Neither culture nor fallback text present | Placeholder text |
//! | `InvalidIdentifierFormat` | `"namespace:key"` malformed | Hard error |
//! | `NotInitialized` | Global context used before `initialize` | Hard error |
//! | `Disposed` | Text read after `dispose()` | Hard error |
//!
//! Data-availability problems never fail a lookup through a
//! [`LocalizedValue`](crate::LocalizedValue): they degrade to placeholder
//! strings. Only usage errors surface as [`LocaleError`].

use thiserror::Error;

/// Placeholder returned when the namespace is unknown.
pub const INVALID_NAMESPACE_TEXT: &str = "#INVALID LOCALIZATION NAMESPACE#";
/// Placeholder returned when the key is unknown within its namespace.
pub const INVALID_KEY_TEXT: &str = "#INVALID LOCALIZATION KEY#";
/// Placeholder returned when an entry has neither the requested nor the
/// fallback culture.
pub const MISSING_FALLBACK_TEXT: &str = "#MISSING FALLBACK TEXT#";
/// Prefix marking text that came from the fallback culture.
pub const FALLBACK_MARKER: char = '#';

/// A lookup that could not produce entry text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("translation namespace '{namespace}' was not found")]
    NamespaceNotFound { namespace: String },
    #[error("translation key '{key}' was not found in namespace '{namespace}'")]
    KeyNotFound { namespace: String, key: String },
    #[error(
        "translation '{namespace}:{key}' has no text for culture '{culture}' nor for fallback '{fallback}'"
    )]
    FallbackMissing {
        namespace: String,
        key: String,
        culture: String,
        fallback: String,
    },
}

impl ResolveError {
    /// The placeholder text a localized value displays for this error.
    #[must_use]
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::NamespaceNotFound { .. } => INVALID_NAMESPACE_TEXT,
            Self::KeyNotFound { .. } => INVALID_KEY_TEXT,
            Self::FallbackMissing { .. } => MISSING_FALLBACK_TEXT,
        }
    }
}

/// How a successful lookup was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Text for the requested culture.
    Exact,
    /// Requested culture missing; text is the fallback culture's, prefixed
    /// with [`FALLBACK_MARKER`].
    CultureNotFoundFallbackApplied,
}

/// Text produced by a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub text: String,
    pub resolution: Resolution,
}

impl Resolved {
    /// Whether the fallback culture supplied the text.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.resolution == Resolution::CultureNotFoundFallbackApplied
    }
}

/// Errors from programmer-usage mistakes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    /// A `"namespace:key"` identifier did not contain exactly one separator
    /// or had a blank part.
    #[error("invalid identifier format '{0}': expected 'namespace:key'")]
    InvalidIdentifierFormat(String),
    /// An entry with a blank namespace or key was offered to the store.
    #[error("invalid translation entry '{namespace}:{key}': namespace and key must be non-empty")]
    InvalidEntry { namespace: String, key: String },
    /// A blank culture code was supplied.
    #[error("invalid culture code '{0}'")]
    InvalidCulture(String),
    /// The global context was used before `initialize`.
    #[error("culture context is not initialized; call `global::initialize` first")]
    NotInitialized,
    /// The global context was initialized twice.
    #[error("culture context is already initialized")]
    AlreadyInitialized,
    /// Text was read from a disposed localized value.
    #[error("localized value '{0}' was read after dispose")]
    Disposed(String),
    /// Configuration failed validation.
    #[error("invalid culture configuration: {0}")]
    Config(String),
}
