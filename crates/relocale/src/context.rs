//! Active culture, allow-list policy, and change broadcast.
//!
//! # Design
//!
//! [`CultureContext`] owns the [`TranslationStore`] and the current culture.
//! Observers register through [`CultureContext::subscribe`] and are held as
//! `Weak` references keyed by [`SubscriptionId`], so the context never keeps
//! an observer alive.
//!
//! # Invariants
//!
//! 1. `current` is always a non-empty normalized code.
//! 2. Notification is edge-triggered: a request that normalizes to the
//!    current culture broadcasts nothing.
//! 3. A broadcast iterates a snapshot of the subscriber map taken before
//!    the first callback runs. Observers added during the broadcast miss
//!    it; observers removed during it are skipped if not yet reached.
//! 4. Dead weak entries are pruned on every broadcast.
//!
//! # Failure Modes
//!
//! - **Disallowed culture**: substituted by the fallback, reported through
//!   [`CultureChange::substituted`] and a `warn` event.
//! - **Blank culture**: rejected with [`LocaleError::InvalidCulture`].
//! - **Subscriber leak**: an observer that is never unsubscribed and never
//!   dropped stays in the map. Values unsubscribe on `dispose()` and on drop.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tracing::{info, trace, warn};

use crate::config::CultureConfig;
use crate::culture::{CultureCode, CultureMatching, Language};
use crate::entry::Identifier;
use crate::error::{LocaleError, ResolveError, Resolved};
use crate::format::format_positional;
use crate::store::TranslationStore;
use crate::value::LocalizedValue;

/// Receiver of culture-change broadcasts.
pub trait CultureObserver: Send + Sync {
    /// Called synchronously on the thread that changed the culture.
    fn culture_changed(&self, culture: &CultureCode);
}

/// Handle returned by [`CultureContext::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Outcome of [`CultureContext::set_culture`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CultureChange {
    pub previous: CultureCode,
    pub current: CultureCode,
    /// Whether the request was outside the allow-list and replaced by the
    /// fallback.
    pub substituted: bool,
    /// Observers that received the broadcast. Zero when unchanged.
    pub notified: usize,
}

impl CultureChange {
    /// Whether the active culture actually moved.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

type ObserverWeak = Weak<dyn CultureObserver>;

/// Process state for translation lookup.
///
/// Create one per process (see [`crate::global`]) or one per isolated scope.
///
/// # Example
///
/// ```
/// use relocale::{CultureConfig, CultureContext, TranslationEntry};
///
/// let ctx = CultureContext::new(CultureConfig::new("en")).unwrap();
/// ctx.store()
///     .register(
///         TranslationEntry::new("Dialogs", "Title")
///             .with_text("en", "Hello")
///             .with_text("fr", "Bonjour"),
///     )
///     .unwrap();
///
/// let title = ctx.value("Dialogs", "Title");
/// assert_eq!(title.text().unwrap(), "Hello");
///
/// ctx.set_culture("fr").unwrap();
/// assert_eq!(title.text().unwrap(), "Bonjour");
/// ```
pub struct CultureContext {
    store: TranslationStore,
    current: RwLock<CultureCode>,
    allowed: BTreeSet<CultureCode>,
    display_names: BTreeMap<CultureCode, String>,
    subscribers: Mutex<BTreeMap<SubscriptionId, ObserverWeak>>,
    next_id: AtomicU64,
}

impl fmt::Debug for CultureContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CultureContext")
            .field("current", &*self.current.read())
            .field("fallback", self.store.fallback())
            .field("allowed", &self.allowed)
            .field("entries", &self.store.len())
            .field("subscriber_count", &self.subscribers.lock().len())
            .finish()
    }
}

impl CultureContext {
    /// Build a context from validated configuration.
    ///
    /// An initial culture outside the allow-list starts on the fallback.
    ///
    /// # Errors
    ///
    /// [`LocaleError::Config`] listing every violation.
    pub fn new(config: CultureConfig) -> Result<Arc<Self>, LocaleError> {
        if let Err(errors) = config.validate() {
            let joined = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(LocaleError::Config(joined));
        }

        let matching = config.matching;
        let store = TranslationStore::new(&config.fallback, matching)?;
        let allowed: BTreeSet<CultureCode> = config
            .allowed
            .iter()
            .filter_map(|c| matching.normalize(c))
            .collect();

        let display_names: BTreeMap<CultureCode, String> = config
            .display_names
            .iter()
            .filter_map(|(culture, name)| {
                matching
                    .normalize(culture)
                    .map(|code| (code, name.trim().to_string()))
            })
            .collect();

        let fallback = store.fallback().clone();
        let current = config
            .culture
            .as_deref()
            .and_then(|c| matching.normalize(c))
            .filter(|c| allowed.is_empty() || allowed.contains(c))
            .unwrap_or(fallback);

        info!(%config, "culture context created");
        Ok(Arc::new(Self {
            store,
            current: RwLock::new(current),
            allowed,
            display_names,
            subscribers: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }))
    }

    /// The translation table.
    #[must_use]
    pub fn store(&self) -> &TranslationStore {
        &self.store
    }

    /// The active culture.
    #[must_use]
    pub fn current(&self) -> CultureCode {
        self.current.read().clone()
    }

    #[must_use]
    pub fn fallback(&self) -> &CultureCode {
        self.store.fallback()
    }

    /// The allow-list. Empty means unrestricted.
    #[must_use]
    pub fn allowed(&self) -> &BTreeSet<CultureCode> {
        &self.allowed
    }

    #[must_use]
    pub fn matching(&self) -> CultureMatching {
        self.store.matching()
    }

    /// Whether `set_culture` would accept `culture` without substitution.
    #[must_use]
    pub fn is_allowed(&self, culture: &str) -> bool {
        self.matching()
            .normalize(culture)
            .is_some_and(|c| self.allowed.is_empty() || self.allowed.contains(&c))
    }

    /// Cultures a language picker should offer: discovered cultures,
    /// restricted to the allow-list when one is set.
    #[must_use]
    pub fn available_cultures(&self) -> BTreeSet<CultureCode> {
        let discovered = self.store.discovered_cultures();
        if self.allowed.is_empty() {
            discovered
        } else {
            discovered.intersection(&self.allowed).cloned().collect()
        }
    }

    /// [`available_cultures`](Self::available_cultures) with display
    /// names, sorted by code.
    #[must_use]
    pub fn languages(&self) -> Vec<Language> {
        self.available_cultures()
            .into_iter()
            .map(|code| {
                let display_name = self
                    .display_names
                    .get(&code)
                    .cloned()
                    .unwrap_or_else(|| code.to_string());
                Language { code, display_name }
            })
            .collect()
    }

    /// Switch the active culture and notify observers.
    ///
    /// Requests outside a non-empty allow-list are replaced by the fallback.
    /// The broadcast runs synchronously on the calling thread.
    ///
    /// # Errors
    ///
    /// [`LocaleError::InvalidCulture`] for a blank request.
    pub fn set_culture(&self, requested: &str) -> Result<CultureChange, LocaleError> {
        let matching = self.matching();
        let normalized = matching
            .normalize(requested)
            .ok_or_else(|| LocaleError::InvalidCulture(requested.to_string()))?;

        let substituted = !self.allowed.is_empty() && !self.allowed.contains(&normalized);
        let target = if substituted {
            warn!(
                culture = requested,
                fallback = %self.fallback(),
                "attempt to change culture to disallowed culture; using fallback"
            );
            self.fallback().clone()
        } else {
            normalized
        };

        let previous = {
            let mut current = self.current.write();
            if *current == target {
                return Ok(CultureChange {
                    previous: target.clone(),
                    current: target,
                    substituted,
                    notified: 0,
                });
            }
            std::mem::replace(&mut *current, target.clone())
        };

        info!(from = %previous, to = %target, "changing application culture");
        let notified = self.broadcast(&target);
        Ok(CultureChange {
            previous,
            current: target,
            substituted,
            notified,
        })
    }

    fn broadcast(&self, culture: &CultureCode) -> usize {
        // Collect live observers first, so no lock is held during callbacks.
        let observers: Vec<(SubscriptionId, Arc<dyn CultureObserver>)> = {
            let mut subscribers = self.subscribers.lock();
            subscribers.retain(|_, weak| weak.strong_count() > 0);
            subscribers
                .iter()
                .filter_map(|(id, weak)| weak.upgrade().map(|observer| (*id, observer)))
                .collect()
        };
        trace!(count = observers.len(), culture = %culture, "broadcasting culture change");
        let mut notified = 0;
        for (id, observer) in &observers {
            // Skip observers unsubscribed by an earlier callback.
            if !self.subscribers.lock().contains_key(id) {
                continue;
            }
            observer.culture_changed(culture);
            notified += 1;
        }
        notified
    }

    /// Register an observer. The context keeps only a weak reference.
    pub fn subscribe<O>(&self, observer: &Arc<O>) -> SubscriptionId
    where
        O: CultureObserver + 'static,
    {
        let weak: Weak<O> = Arc::downgrade(observer);
        let weak: ObserverWeak = weak;
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.lock().insert(id, weak);
        id
    }

    /// Remove an observer. Returns whether `id` was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.lock().remove(&id).is_some()
    }

    /// Number of live observers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    // -----------------------------------------------------------------
    // Lookup conveniences
    // -----------------------------------------------------------------

    /// Resolve in the active culture.
    ///
    /// # Errors
    ///
    /// See [`TranslationStore::resolve`].
    pub fn resolve(&self, key: &str, namespace: &str) -> Result<Resolved, ResolveError> {
        self.store.resolve(key, namespace, self.current().as_str())
    }

    /// Text in the active culture, with placeholders for missing data.
    #[must_use]
    pub fn translate(&self, key: &str, namespace: &str) -> String {
        self.translate_in(key, namespace, self.current().as_str())
    }

    /// Text in `culture`, with placeholders for missing data.
    #[must_use]
    pub fn translate_in(&self, key: &str, namespace: &str, culture: &str) -> String {
        match self.store.resolve(key, namespace, culture) {
            Ok(resolved) => resolved.text,
            Err(err) => err.placeholder().to_string(),
        }
    }

    /// Text in the active culture with `{0}`, `{1}`, … replaced by `args`.
    #[must_use]
    pub fn translate_args<S: AsRef<str>>(&self, key: &str, namespace: &str, args: &[S]) -> String {
        format_positional(&self.translate(key, namespace), args)
    }

    /// A value bound to `(namespace, key)`, whether or not it is registered.
    #[must_use]
    pub fn value(self: &Arc<Self>, namespace: &str, key: &str) -> LocalizedValue {
        LocalizedValue::key_bound(self, namespace, key)
    }

    /// A value for the combined `"namespace:key"` form.
    ///
    /// # Errors
    ///
    /// [`LocaleError::InvalidIdentifierFormat`] for malformed input.
    pub fn value_for(self: &Arc<Self>, combined: &str) -> Result<LocalizedValue, LocaleError> {
        LocalizedValue::from_identifier(self, combined)
    }

    /// A value for `(namespace, key)` only if the store knows it.
    #[must_use]
    pub fn try_get_value(self: &Arc<Self>, namespace: &str, key: &str) -> Option<LocalizedValue> {
        self.store
            .is_known(key, namespace)
            .then(|| LocalizedValue::bound_to(self, Identifier::new(namespace, key)))
    }
}
