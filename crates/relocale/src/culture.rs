//! Culture codes and the matching policy shared by registration and lookup.
//!
//! Every culture string that enters the crate (entry texts, lookup
//! requests, the fallback, the allow-list) passes through
//! [`CultureMatching::normalize`] with the store's policy, so comparisons
//! are always between codes in the same canonical form.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// How culture tags are collapsed before comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CultureMatching {
    /// Collapse to the primary language subtag: `"fr-FR"` becomes `"fr"`.
    #[default]
    Root,
    /// Keep the full tag: `"fr-FR"` becomes `"fr-fr"`.
    Exact,
}

impl CultureMatching {
    /// Normalize a raw culture string.
    ///
    /// Returns `None` for blank input. Codes are trimmed, lowercased and
    /// `_` separators are rewritten to `-`.
    #[must_use]
    pub fn normalize(self, raw: &str) -> Option<CultureCode> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let mut code: String = trimmed
            .chars()
            .map(|c| if c == '_' { '-' } else { c.to_ascii_lowercase() })
            .collect();
        if self == Self::Root
            && let Some(idx) = code.find('-')
        {
            code.truncate(idx);
        }
        if code.is_empty() {
            return None;
        }
        Some(CultureCode(code))
    }
}

impl fmt::Display for CultureMatching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "root"),
            Self::Exact => write!(f, "exact"),
        }
    }
}

impl FromStr for CultureMatching {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "root" | "language" => Ok(Self::Root),
            "exact" | "full" => Ok(Self::Exact),
            other => Err(format!("unknown culture matching '{other}'")),
        }
    }
}

/// A normalized culture code (e.g. `"en"`, `"fr-fr"`).
///
/// Only [`CultureMatching::normalize`] constructs these, so two codes
/// compare equal exactly when they denote the same culture under the
/// active policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CultureCode(String);

impl CultureCode {
    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the owned string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CultureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CultureCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CultureCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for CultureCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CultureCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A culture offered to language pickers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Language {
    pub code: CultureCode,
    /// Native name such as `"Français"`; the code itself when none is
    /// configured.
    pub display_name: String,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.code, self.display_name)
    }
}
