//! Concurrent translation table with culture fallback.
//!
//! # Invariants
//!
//! 1. **One slot per identity**: every entry is reachable from exactly one
//!    case-folded `(namespace, key)` slot. Re-registering replaces the
//!    whole entry.
//!
//! 2. **Atomic replacement**: entries are stored behind `Arc` and swapped
//!    in a single map insert, so readers see either the old or the new
//!    entry, never a mix.
//!
//! 3. **Consistent culture policy**: entry texts are re-keyed with the
//!    store's [`CultureMatching`] at registration, and lookups normalize
//!    the requested culture with the same policy.
//!
//! # Concurrency
//!
//! Both levels are `DashMap`s. Registrations of distinct keys never lose
//! updates. Registrations of the same key race and the last insert wins;
//! no ordering between such writers is guaranteed.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing namespace | Namespace never registered | `NamespaceNotFound` |
//! | Missing key | Key not in namespace | `KeyNotFound` |
//! | Missing culture | Entry lacks culture | `#`-prefixed fallback text |
//! | Missing fallback | Entry lacks fallback too | `FallbackMissing` |
//! | Duplicate register | Same identity twice | Overwrite + `warn` event |

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use dashmap::{DashMap, DashSet};
use tracing::{debug, info, warn};

use crate::culture::{CultureCode, CultureMatching};
use crate::entry::{Identifier, TranslationEntry, fold};
use crate::error::{FALLBACK_MARKER, LocaleError, ResolveError, Resolution, Resolved};

type KeyTable = DashMap<String, Arc<TranslationEntry>>;

/// Central translation table.
///
/// # Example
///
/// ```
/// use relocale::{CultureMatching, TranslationEntry, TranslationStore};
///
/// let store = TranslationStore::new("en", CultureMatching::Root).unwrap();
/// store
///     .register(
///         TranslationEntry::new("Dialogs", "Title")
///             .with_text("en", "Hello")
///             .with_text("fr", "Bonjour"),
///     )
///     .unwrap();
///
/// assert_eq!(store.resolve("Title", "Dialogs", "fr").unwrap().text, "Bonjour");
/// assert_eq!(store.resolve("Title", "Dialogs", "de").unwrap().text, "#Hello");
/// assert!(store.is_known("title", "dialogs"));
/// ```
#[derive(Debug)]
pub struct TranslationStore {
    namespaces: DashMap<String, KeyTable>,
    cultures: DashSet<CultureCode>,
    fallback: CultureCode,
    matching: CultureMatching,
}

impl TranslationStore {
    /// Create an empty store.
    ///
    /// # Errors
    ///
    /// [`LocaleError::InvalidCulture`] if `fallback` is blank.
    pub fn new(fallback: &str, matching: CultureMatching) -> Result<Self, LocaleError> {
        let fallback = matching
            .normalize(fallback)
            .ok_or_else(|| LocaleError::InvalidCulture(fallback.to_string()))?;
        Ok(Self {
            namespaces: DashMap::new(),
            cultures: DashSet::new(),
            fallback,
            matching,
        })
    }

    /// The culture consulted when an entry lacks the requested one.
    #[must_use]
    pub fn fallback(&self) -> &CultureCode {
        &self.fallback
    }

    /// The normalization policy for culture codes.
    #[must_use]
    pub fn matching(&self) -> CultureMatching {
        self.matching
    }

    /// Insert or replace an entry.
    ///
    /// Texts whose culture codes collapse to the same normalized code keep
    /// the first one in code order, so a bare `"en"` text wins over
    /// `"en-gb"` under [`CultureMatching::Root`]. Blank culture codes are
    /// dropped.
    ///
    /// # Errors
    ///
    /// [`LocaleError::InvalidEntry`] if the namespace or key is blank.
    pub fn register(&self, entry: TranslationEntry) -> Result<(), LocaleError> {
        if entry.namespace.trim().is_empty() || entry.key.trim().is_empty() {
            return Err(LocaleError::InvalidEntry {
                namespace: entry.namespace,
                key: entry.key,
            });
        }
        debug!(namespace = %entry.namespace, key = %entry.key, "registering translation");

        let entry = self.normalize_entry(entry);
        for culture in entry.texts.keys() {
            if let Some(code) = self.matching.normalize(culture)
                && self.cultures.insert(code)
            {
                info!(culture = %culture, "registering discovered culture");
            }
        }

        let ns = fold(&entry.namespace);
        let key = fold(&entry.key);
        let (namespace, key_display) = (entry.namespace.clone(), entry.key.clone());
        let previous = self
            .namespaces
            .entry(ns)
            .or_default()
            .insert(key, Arc::new(entry));
        if previous.is_some() {
            warn!(
                namespace = %namespace,
                key = %key_display,
                "duplicate registration of a translation; replacing previous entry"
            );
        }
        Ok(())
    }

    /// Register every entry, stopping at the first invalid one.
    ///
    /// Returns the number of entries registered.
    ///
    /// # Errors
    ///
    /// The first [`LocaleError::InvalidEntry`] encountered.
    pub fn register_all(
        &self,
        entries: impl IntoIterator<Item = TranslationEntry>,
    ) -> Result<usize, LocaleError> {
        let mut count = 0;
        for entry in entries {
            self.register(entry)?;
            count += 1;
        }
        Ok(count)
    }

    fn normalize_entry(&self, entry: TranslationEntry) -> TranslationEntry {
        let mut texts = BTreeMap::new();
        for (culture, text) in entry.texts {
            if let Some(code) = self.matching.normalize(&culture) {
                texts.entry(code.into_string()).or_insert(text);
            }
        }
        TranslationEntry { texts, ..entry }
    }

    /// Whether `namespace` holds `key`, independent of culture.
    #[must_use]
    pub fn is_known(&self, key: &str, namespace: &str) -> bool {
        self.namespaces
            .get(&fold(namespace))
            .is_some_and(|keys| keys.contains_key(&fold(key)))
    }

    /// The stored (normalized) entry for an identity.
    #[must_use]
    pub fn get(&self, id: &Identifier) -> Option<Arc<TranslationEntry>> {
        self.lookup(id.key(), id.namespace()).ok()
    }

    fn lookup(&self, key: &str, namespace: &str) -> Result<Arc<TranslationEntry>, ResolveError> {
        let keys = self
            .namespaces
            .get(&fold(namespace))
            .ok_or_else(|| ResolveError::NamespaceNotFound {
                namespace: namespace.to_string(),
            })?;
        keys.get(&fold(key))
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ResolveError::KeyNotFound {
                namespace: namespace.to_string(),
                key: key.to_string(),
            })
    }

    /// Look up the text for `key` in `namespace` and `culture`.
    ///
    /// A blank `culture` is treated as the fallback culture.
    ///
    /// # Errors
    ///
    /// [`ResolveError`] when the namespace, key, or both the requested and
    /// fallback texts are missing.
    pub fn resolve(&self, key: &str, namespace: &str, culture: &str) -> Result<Resolved, ResolveError> {
        let entry = match self.lookup(key, namespace) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(%err, "translation lookup failed");
                return Err(err);
            }
        };

        let requested = self
            .matching
            .normalize(culture)
            .unwrap_or_else(|| self.fallback.clone());
        if let Some(text) = entry.texts.get(requested.as_str()) {
            return Ok(Resolved {
                text: text.clone(),
                resolution: Resolution::Exact,
            });
        }

        let missing = || ResolveError::FallbackMissing {
            namespace: namespace.to_string(),
            key: key.to_string(),
            culture: requested.to_string(),
            fallback: self.fallback.to_string(),
        };
        if requested == self.fallback {
            return Err(missing());
        }
        match entry.texts.get(self.fallback.as_str()) {
            Some(text) => {
                warn!(
                    culture = %requested,
                    key,
                    namespace,
                    fallback = %self.fallback,
                    "translation culture not found; using fallback culture"
                );
                let mut marked = String::with_capacity(text.len() + 1);
                marked.push(FALLBACK_MARKER);
                marked.push_str(text);
                Ok(Resolved {
                    text: marked,
                    resolution: Resolution::CultureNotFoundFallbackApplied,
                })
            }
            None => {
                let err = missing();
                warn!(%err, "translation lookup failed");
                Err(err)
            }
        }
    }

    /// Every culture seen in any registered entry.
    #[must_use]
    pub fn discovered_cultures(&self) -> BTreeSet<CultureCode> {
        self.cultures.iter().map(|c| c.key().clone()).collect()
    }

    /// All registered identities, sorted.
    #[must_use]
    pub fn identifiers(&self) -> Vec<Identifier> {
        let mut ids: Vec<Identifier> = self.entries().iter().map(|e| e.identifier()).collect();
        ids.sort_unstable();
        ids
    }

    /// Snapshot of all entries, in no particular order.
    #[must_use]
    pub fn entries(&self) -> Vec<Arc<TranslationEntry>> {
        self.namespaces
            .iter()
            .flat_map(|keys| {
                keys.iter()
                    .map(|entry| Arc::clone(entry.value()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.namespaces.iter().map(|keys| keys.len()).sum()
    }

    /// Whether no entry has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -----------------------------------------------------------------
    // Coverage
    // -----------------------------------------------------------------

    /// Per-culture coverage across all entries, without fallback.
    ///
    /// Cultures are sorted; missing identifiers are sorted.
    #[must_use]
    pub fn coverage_report(&self) -> CoverageReport {
        let entries = self.entries();
        let total = entries.len();

        let cultures = self
            .discovered_cultures()
            .into_iter()
            .map(|culture| {
                let mut missing: Vec<Identifier> = entries
                    .iter()
                    .filter(|e| !e.texts.contains_key(culture.as_str()))
                    .map(|e| e.identifier())
                    .collect();
                missing.sort_unstable();
                let present = total.saturating_sub(missing.len());
                let coverage_percent = if total == 0 {
                    100.0
                } else {
                    (present as f32 / total as f32) * 100.0
                };
                CultureCoverage {
                    culture,
                    present,
                    missing,
                    coverage_percent,
                }
            })
            .collect();

        CoverageReport {
            total_entries: total,
            cultures,
        }
    }
}

/// How completely each discovered culture is translated.
#[derive(Debug, Clone)]
pub struct CoverageReport {
    /// Number of registered entries.
    pub total_entries: usize,
    pub cultures: Vec<CultureCoverage>,
}

/// Coverage for one culture.
#[derive(Debug, Clone)]
pub struct CultureCoverage {
    pub culture: CultureCode,
    /// Entries providing text for this culture.
    pub present: usize,
    /// Entries lacking it.
    pub missing: Vec<Identifier>,
    /// Coverage as a percentage (0.0–100.0).
    pub coverage_percent: f32,
}
