//! Translation records and their `(namespace, key)` identity.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::LocaleError;

/// Separator in the combined `"namespace:key"` form.
pub const IDENTIFIER_SEPARATOR: char = ':';

/// The `(namespace, key)` identity of a translation.
///
/// Comparison is case-insensitive, matching how the store indexes entries.
/// The original casing is kept for display.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Identifier {
    #[cfg_attr(feature = "serde", serde(rename = "Namespace"))]
    namespace: String,
    #[cfg_attr(feature = "serde", serde(rename = "Key"))]
    key: String,
}

impl Identifier {
    /// Build an identifier without validation.
    ///
    /// Blank parts yield an "empty" identity; localized values bound to it
    /// resolve to the empty string.
    pub fn new(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
        }
    }

    /// Parse the combined `"namespace:key"` form.
    ///
    /// # Errors
    ///
    /// [`LocaleError::InvalidIdentifierFormat`] unless the input holds
    /// exactly one separator with non-blank text on both sides.
    pub fn parse(combined: &str) -> Result<Self, LocaleError> {
        let mut parts = combined.split(IDENTIFIER_SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(ns), Some(key), None) if !ns.trim().is_empty() && !key.trim().is_empty() => {
                Ok(Self::new(ns.trim(), key.trim()))
            }
            _ => Err(LocaleError::InvalidIdentifierFormat(combined.to_string())),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether either part is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.namespace.trim().is_empty() || self.key.trim().is_empty()
    }

    /// Lowercased `(namespace, key)` pair used for hashing and ordering.
    pub(crate) fn folded(&self) -> (String, String) {
        (fold(&self.namespace), fold(&self.key))
    }
}

/// Case folding used for namespace and key comparison.
pub(crate) fn fold(s: &str) -> String {
    s.to_lowercase()
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.folded() == other.folded()
    }
}

impl Eq for Identifier {}

impl std::hash::Hash for Identifier {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.folded().hash(state);
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.folded().cmp(&other.folded())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{IDENTIFIER_SEPARATOR}{}", self.namespace, self.key)
    }
}

impl FromStr for Identifier {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// One translatable phrase with its per-culture texts.
///
/// # Example
///
/// ```
/// use relocale::TranslationEntry;
///
/// let entry = TranslationEntry::new("Dialogs", "Title")
///     .with_description("Main dialog caption")
///     .with_text("en", "Hello")
///     .with_text("fr", "Bonjour");
/// assert_eq!(entry.text("fr"), Some("Bonjour"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TranslationEntry {
    pub namespace: String,
    pub key: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Texts keyed by culture code.
    pub texts: BTreeMap<String, String>,
}

impl TranslationEntry {
    /// Create an entry without texts.
    pub fn new(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
            description: String::new(),
            texts: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add or replace the text for `culture`.
    #[must_use]
    pub fn with_text(mut self, culture: impl Into<String>, text: impl Into<String>) -> Self {
        self.texts.insert(culture.into(), text.into());
        self
    }

    /// The entry's identity.
    #[must_use]
    pub fn identifier(&self) -> Identifier {
        Identifier::new(self.namespace.clone(), self.key.clone())
    }

    /// Text stored under exactly `culture`, if any.
    #[must_use]
    pub fn text(&self, culture: &str) -> Option<&str> {
        self.texts.get(culture).map(String::as_str)
    }

    /// Culture codes this entry provides text for.
    pub fn cultures(&self) -> impl Iterator<Item = &str> {
        self.texts.keys().map(String::as_str)
    }
}
