//! Observable localized text that follows the active culture.
//!
//! # Design
//!
//! A [`LocalizedValue`] is a cheap, clonable handle to shared state. Clones
//! see the same cached text, observers, and disposal state. The value is one
//! of three variants:
//!
//! - **key-bound**: resolved from the store by `(namespace, key)`;
//! - **constant**: fixed text that never reacts to culture changes;
//! - **composed**: a format-source value plus ordered argument values,
//!   substituted positionally (`{0}`, `{1}`, …).
//!
//! Values are immutable once built, and a composed value can only reference
//! values that already exist, so compositions are acyclic by construction.
//!
//! # Invariants
//!
//! 1. Cached text is always recomputable from the variant and the context's
//!    current culture; it is filled on first read and, once filled,
//!    recomputed on every culture-change broadcast, never otherwise.
//! 2. `version` increments by exactly 1 each time a recomputation changes
//!    the text, and observers are notified only then.
//! 3. After `dispose()` (or when the last handle drops) the value holds no
//!    subscription in its context.
//!
//! # Failure Modes
//!
//! - **Missing translation data**: resolves to a placeholder string
//!   (`"#INVALID LOCALIZATION KEY#"` and friends) instead of failing.
//! - **Read after dispose**: [`LocalizedValue::text`] returns
//!   [`LocaleError::Disposed`].

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{self, AtomicBool};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::context::{CultureContext, CultureObserver, SubscriptionId};
use crate::culture::CultureCode;
use crate::entry::Identifier;
use crate::error::LocaleError;
use crate::format::format_positional;

type CallbackArc = Arc<dyn Fn(&str) + Send + Sync>;
type CallbackWeak = Weak<dyn Fn(&str) + Send + Sync>;

/// Which variant a value is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    KeyBound,
    Constant,
    Composed,
}

enum Repr {
    KeyBound(Identifier),
    Constant(String),
    Composed {
        source: LocalizedValue,
        args: Vec<LocalizedValue>,
    },
}

#[derive(Default)]
struct TextCache {
    text: Option<String>,
    version: u64,
}

struct ValueInner {
    repr: Repr,
    context: Option<Arc<CultureContext>>,
    cache: Mutex<TextCache>,
    observers: Mutex<Vec<CallbackWeak>>,
    subscription: Mutex<Option<SubscriptionId>>,
    disposed: AtomicBool,
    /// Shared values that ignore `dispose()`.
    pinned: bool,
}

impl ValueInner {
    fn new(repr: Repr, context: Option<Arc<CultureContext>>) -> Self {
        Self {
            repr,
            context,
            cache: Mutex::new(TextCache::default()),
            observers: Mutex::new(Vec::new()),
            subscription: Mutex::new(None),
            disposed: AtomicBool::new(false),
            pinned: false,
        }
    }

    fn is_empty(&self) -> bool {
        match &self.repr {
            Repr::KeyBound(id) => id.is_empty(),
            Repr::Constant(_) => false,
            Repr::Composed { source, .. } => source.inner.is_empty(),
        }
    }

    fn current_culture(&self) -> Option<CultureCode> {
        self.context.as_ref().map(|ctx| ctx.current())
    }

    /// Resolve the variant in `culture`. Pure: reads no cache.
    fn compute(&self, culture: Option<&CultureCode>) -> String {
        match &self.repr {
            Repr::Constant(text) => text.clone(),
            Repr::KeyBound(id) if id.is_empty() => String::new(),
            Repr::KeyBound(id) => {
                let Some(ctx) = &self.context else {
                    return String::new();
                };
                let culture = culture.map_or("", CultureCode::as_str);
                match ctx.store().resolve(id.key(), id.namespace(), culture) {
                    Ok(resolved) => resolved.text,
                    Err(err) => err.placeholder().to_string(),
                }
            }
            Repr::Composed { source, .. } if source.inner.is_empty() => String::new(),
            Repr::Composed { source, args } => {
                let template = source.inner.compute(culture);
                let args: Vec<String> = args.iter().map(|a| a.inner.compute(culture)).collect();
                format_positional(&template, &args)
            }
        }
    }

    fn release(&self) {
        let id = self.subscription.lock().take();
        if let (Some(id), Some(ctx)) = (id, &self.context) {
            ctx.unsubscribe(id);
        }
    }

    fn notify(&self, text: &str) {
        // Collect live callbacks first (to avoid holding the lock during calls).
        let callbacks: Vec<CallbackArc> = {
            let mut observers = self.observers.lock();
            observers.retain(|w| w.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };
        for cb in &callbacks {
            cb(text);
        }
    }
}

impl CultureObserver for ValueInner {
    fn culture_changed(&self, _culture: &CultureCode) {
        if self.disposed.load(atomic::Ordering::Acquire) {
            return;
        }
        // Uses the context's current culture, not the broadcast payload.
        let changed = {
            let mut cache = self.cache.lock();
            // Never read: stay lazy, the first `text()` resolves it.
            if cache.text.is_none() {
                return;
            }
            let text = self.compute(self.current_culture().as_ref());
            let changed = cache.text.as_ref().is_some_and(|old| *old != text);
            if changed {
                cache.version += 1;
            }
            cache.text = Some(text.clone());
            changed.then_some(text)
        };
        if let Some(text) = changed {
            self.notify(&text);
        }
    }
}

impl Drop for ValueInner {
    fn drop(&mut self) {
        self.release();
    }
}

/// Observable handle to localized text.
///
/// # Example
///
/// ```
/// use relocale::{CultureConfig, CultureContext, LocalizedValue, TranslationEntry};
///
/// let ctx = CultureContext::new(CultureConfig::new("en")).unwrap();
/// ctx.store()
///     .register(
///         TranslationEntry::new("Dialogs", "Greet")
///             .with_text("en", "Hello {0}")
///             .with_text("fr", "Bonjour {0}"),
///     )
///     .unwrap();
///
/// let greet = ctx
///     .value("Dialogs", "Greet")
///     .format([LocalizedValue::constant("World")]);
/// assert_eq!(greet.text().unwrap(), "Hello World");
///
/// ctx.set_culture("fr").unwrap();
/// assert_eq!(greet.text().unwrap(), "Bonjour World");
/// ```
#[derive(Clone)]
pub struct LocalizedValue {
    inner: Arc<ValueInner>,
}

impl LocalizedValue {
    fn build(repr: Repr, context: Option<Arc<CultureContext>>) -> Self {
        let inner = Arc::new(ValueInner::new(repr, context));
        let reactive = !matches!(inner.repr, Repr::Constant(_)) && !inner.is_empty();
        if reactive && let Some(ctx) = &inner.context {
            let id = ctx.subscribe(&inner);
            *inner.subscription.lock() = Some(id);
        }
        Self { inner }
    }

    /// A value bound to `(namespace, key)` in `context`.
    ///
    /// Blank parts produce an empty value whose text is `""`.
    #[must_use]
    pub fn key_bound(
        context: &Arc<CultureContext>,
        namespace: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self::bound_to(context, Identifier::new(namespace, key))
    }

    /// A value bound to an existing identifier.
    #[must_use]
    pub fn bound_to(context: &Arc<CultureContext>, id: Identifier) -> Self {
        Self::build(Repr::KeyBound(id), Some(Arc::clone(context)))
    }

    /// A value for the combined `"namespace:key"` form.
    ///
    /// # Errors
    ///
    /// [`LocaleError::InvalidIdentifierFormat`] for malformed input.
    pub fn from_identifier(context: &Arc<CultureContext>, combined: &str) -> Result<Self, LocaleError> {
        Identifier::parse(combined).map(|id| Self::bound_to(context, id))
    }

    /// Fixed text, independent of culture.
    #[must_use]
    pub fn constant(text: impl Into<String>) -> Self {
        Self::build(Repr::Constant(text.into()), None)
    }

    /// A constant shared process-wide; `dispose()` leaves it usable.
    pub(crate) fn pinned_constant(text: impl Into<String>) -> Self {
        let mut inner = ValueInner::new(Repr::Constant(text.into()), None);
        inner.pinned = true;
        Self {
            inner: Arc::new(inner),
        }
    }

    /// `source` used as a template with `args` substituted by position.
    ///
    /// The composed value follows the context of the first context-bound
    /// part (source first, then arguments). A composition made only of
    /// constants never changes.
    #[must_use]
    pub fn composed(source: LocalizedValue, args: impl IntoIterator<Item = LocalizedValue>) -> Self {
        let args: Vec<LocalizedValue> = args.into_iter().collect();
        let context = std::iter::once(&source)
            .chain(args.iter())
            .find_map(|part| part.inner.context.clone());
        Self::build(Repr::Composed { source, args }, context)
    }

    /// Compose with `self` as the template.
    #[must_use]
    pub fn format(&self, args: impl IntoIterator<Item = LocalizedValue>) -> Self {
        Self::composed(self.clone(), args)
    }

    /// Current text with plain string arguments substituted.
    ///
    /// # Errors
    ///
    /// [`LocaleError::Disposed`] after [`dispose`](Self::dispose).
    pub fn format_text<S: AsRef<str>>(&self, args: &[S]) -> Result<String, LocaleError> {
        self.text().map(|template| format_positional(&template, args))
    }

    /// The resolved text in the active culture.
    ///
    /// Resolved on first access and cached until the next culture change.
    ///
    /// # Errors
    ///
    /// [`LocaleError::Disposed`] after [`dispose`](Self::dispose).
    pub fn text(&self) -> Result<String, LocaleError> {
        if self.is_disposed() {
            return Err(LocaleError::Disposed(self.describe()));
        }
        let mut cache = self.inner.cache.lock();
        if let Some(text) = &cache.text {
            return Ok(text.clone());
        }
        let text = self.inner.compute(self.inner.current_culture().as_ref());
        cache.text = Some(text.clone());
        Ok(text)
    }

    /// Number of text changes caused by culture changes.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.cache.lock().version
    }

    /// Call `callback` with the new text whenever a culture change alters
    /// it.
    ///
    /// Returns a [`TextSubscription`] guard; dropping it unsubscribes. The
    /// text is resolved immediately so the first change is detected.
    pub fn observe(&self, callback: impl Fn(&str) + Send + Sync + 'static) -> TextSubscription {
        let strong: CallbackArc = Arc::new(callback);
        let weak = Arc::downgrade(&strong);
        if !self.is_disposed() {
            let _ = self.text();
            let mut observers = self.inner.observers.lock();
            observers.retain(|w| w.strong_count() > 0);
            observers.push(weak);
        }
        TextSubscription {
            _guard: Box::new(strong),
        }
    }

    /// Number of registered text observers (including dropped ones not yet
    /// pruned).
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.observers.lock().len()
    }

    /// Stop following culture changes and drop the cache.
    ///
    /// Affects every clone of this handle. Idempotent. The shared value
    /// returned by [`crate::enums::invalid`] ignores it.
    pub fn dispose(&self) {
        if self.inner.pinned || self.inner.disposed.swap(true, atomic::Ordering::AcqRel) {
            return;
        }
        self.inner.release();
        self.inner.cache.lock().text = None;
        self.inner.observers.lock().clear();
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(atomic::Ordering::Acquire)
    }

    /// Whether the value has no resolvable identity (blank namespace or
    /// key). Constants are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self.inner.repr {
            Repr::KeyBound(_) => ValueKind::KeyBound,
            Repr::Constant(_) => ValueKind::Constant,
            Repr::Composed { .. } => ValueKind::Composed,
        }
    }

    /// The `(namespace, key)` of a key-bound value.
    #[must_use]
    pub fn identifier(&self) -> Option<&Identifier> {
        match &self.inner.repr {
            Repr::KeyBound(id) => Some(id),
            _ => None,
        }
    }

    /// The context this value follows, if any.
    #[must_use]
    pub fn context(&self) -> Option<&Arc<CultureContext>> {
        self.inner.context.as_ref()
    }

    /// Whether both handles share the same state.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    fn describe(&self) -> String {
        match &self.inner.repr {
            Repr::KeyBound(id) => id.to_string(),
            Repr::Constant(text) => format!("constant {text:?}"),
            Repr::Composed { source, args } => {
                format!("{} with {} args", source.describe(), args.len())
            }
        }
    }

    fn rank(&self) -> u8 {
        match self.inner.repr {
            Repr::KeyBound(_) => 0,
            Repr::Composed { .. } => 1,
            Repr::Constant(_) => 2,
        }
    }
}

impl PartialEq for LocalizedValue {
    fn eq(&self, other: &Self) -> bool {
        if Self::ptr_eq(self, other) {
            return true;
        }
        match (&self.inner.repr, &other.inner.repr) {
            (Repr::KeyBound(a), Repr::KeyBound(b)) => a == b,
            (Repr::Constant(a), Repr::Constant(b)) => a == b,
            (
                Repr::Composed { source: sa, args: aa },
                Repr::Composed { source: sb, args: ab },
            ) => sa == sb && aa == ab,
            _ => false,
        }
    }
}

impl Eq for LocalizedValue {}

impl Hash for LocalizedValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match &self.inner.repr {
            Repr::KeyBound(id) => id.hash(state),
            Repr::Constant(text) => text.hash(state),
            Repr::Composed { source, args } => {
                source.hash(state);
                args.hash(state);
            }
        }
    }
}

impl PartialOrd for LocalizedValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Key-bound values sort by namespace then key, composed values follow,
/// constants sort last by text.
impl Ord for LocalizedValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.inner.repr, &other.inner.repr) {
            (Repr::KeyBound(a), Repr::KeyBound(b)) => a.cmp(b),
            (Repr::Constant(a), Repr::Constant(b)) => a.cmp(b),
            (
                Repr::Composed { source: sa, args: aa },
                Repr::Composed { source: sb, args: ab },
            ) => sa.cmp(sb).then_with(|| aa.cmp(ab)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Prints the current text; a disposed value prints nothing.
impl fmt::Display for LocalizedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text().unwrap_or_default())
    }
}

impl fmt::Debug for LocalizedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.cache.lock();
        f.debug_struct("LocalizedValue")
            .field("value", &self.describe())
            .field("cached", &cache.text)
            .field("version", &cache.version)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// RAII guard for a text observer.
///
/// Dropping the guard drops the callback; the weak entry in the value's
/// observer list is pruned on the next notification.
pub struct TextSubscription {
    _guard: Box<dyn std::any::Any + Send + Sync>,
}

impl fmt::Debug for TextSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextSubscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CultureConfig;
    use crate::entry::TranslationEntry;
    use crate::error::{INVALID_KEY_TEXT, INVALID_NAMESPACE_TEXT};
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};

    fn context() -> Arc<CultureContext> {
        let ctx = CultureContext::new(CultureConfig::new("en")).unwrap();
        let store = ctx.store();
        store
            .register(
                TranslationEntry::new("Dialogs", "Title")
                    .with_text("en", "Hello")
                    .with_text("fr", "Bonjour"),
            )
            .unwrap();
        store
            .register(
                TranslationEntry::new("Dialogs", "Greet")
                    .with_text("en", "Hello {0}")
                    .with_text("fr", "Bonjour {0}"),
            )
            .unwrap();
        store
            .register(
                TranslationEntry::new("Dialogs", "Pair")
                    .with_text("en", "{0} and {1}")
                    .with_text("fr", "{0} et {1}"),
            )
            .unwrap();
        store
            .register(
                TranslationEntry::new("Names", "World")
                    .with_text("en", "World")
                    .with_text("fr", "Monde"),
            )
            .unwrap();
        ctx
    }

    #[test]
    fn key_bound_follows_culture() {
        let ctx = context();
        let title = ctx.value("Dialogs", "Title");
        assert_eq!(title.text().unwrap(), "Hello");
        ctx.set_culture("fr").unwrap();
        assert_eq!(title.text().unwrap(), "Bonjour");
        assert_eq!(title.version(), 1);
    }

    #[test]
    fn lazy_value_resolves_on_first_read() {
        let ctx = context();
        let title = ctx.value("Dialogs", "Title");
        ctx.set_culture("fr").unwrap();
        // Never read before the change: nothing cached, no version bump.
        assert!(format!("{title:?}").contains("cached: None"));
        assert_eq!(title.version(), 0);
        assert_eq!(title.text().unwrap(), "Bonjour");
    }

    #[test]
    fn unread_missing_value_stays_uncached() {
        let ctx = context();
        let missing = ctx.value("Dialogs", "Nope");
        ctx.set_culture("fr").unwrap();
        assert!(format!("{missing:?}").contains("cached: None"));
        assert_eq!(missing.text().unwrap(), INVALID_KEY_TEXT);
    }

    #[test]
    fn repeated_observe_on_constant_does_not_grow() {
        let constant = LocalizedValue::constant("Fixed");
        for _ in 0..100 {
            let sub = constant.observe(|_| {});
            drop(sub);
        }
        assert!(constant.observer_count() <= 1);
    }

    #[test]
    fn pinned_constant_ignores_dispose() {
        let pinned = LocalizedValue::pinned_constant("Shared");
        pinned.dispose();
        assert!(!pinned.is_disposed());
        assert_eq!(pinned.text().unwrap(), "Shared");
    }

    #[test]
    fn missing_data_yields_placeholders() {
        let ctx = context();
        assert_eq!(ctx.value("Menus", "File").text().unwrap(), INVALID_NAMESPACE_TEXT);
        assert_eq!(ctx.value("Dialogs", "Nope").text().unwrap(), INVALID_KEY_TEXT);
    }

    #[test]
    fn missing_culture_yields_marked_fallback() {
        let ctx = context();
        ctx.set_culture("de").unwrap();
        assert_eq!(ctx.value("Dialogs", "Title").text().unwrap(), "#Hello");
    }

    #[test]
    fn empty_value_is_blank_and_unsubscribed() {
        let ctx = context();
        let empty = ctx.value("", "Title");
        assert!(empty.is_empty());
        assert_eq!(empty.text().unwrap(), "");
        assert_eq!(ctx.subscriber_count(), 0);
    }

    #[test]
    fn constant_never_reacts() {
        let ctx = context();
        let constant = LocalizedValue::constant("Fixed");
        assert!(!constant.is_empty());
        assert!(constant.context().is_none());
        ctx.set_culture("fr").unwrap();
        assert_eq!(constant.text().unwrap(), "Fixed");
        assert_eq!(constant.version(), 0);
    }

    #[test]
    fn composed_with_constant_arg() {
        let ctx = context();
        let greet = ctx
            .value("Dialogs", "Greet")
            .format([LocalizedValue::constant("World")]);
        assert_eq!(greet.kind(), ValueKind::Composed);
        assert_eq!(greet.text().unwrap(), "Hello World");
        ctx.set_culture("fr").unwrap();
        assert_eq!(greet.text().unwrap(), "Bonjour World");
    }

    #[test]
    fn composed_recurses_through_localized_args() {
        let ctx = context();
        let inner = ctx.value("Dialogs", "Greet").format([ctx.value("Names", "World")]);
        let outer = LocalizedValue::composed(
            ctx.value("Dialogs", "Pair"),
            [inner, LocalizedValue::constant("!")],
        );
        assert_eq!(outer.text().unwrap(), "Hello World and !");
        ctx.set_culture("fr").unwrap();
        assert_eq!(outer.text().unwrap(), "Bonjour Monde et !");
    }

    #[test]
    fn composed_of_constants_is_static() {
        let ctx = context();
        let before = ctx.subscriber_count();
        let composed = LocalizedValue::constant("{0}-{1}")
            .format([LocalizedValue::constant("a"), LocalizedValue::constant("b")]);
        assert!(composed.context().is_none());
        assert_eq!(composed.text().unwrap(), "a-b");
        assert_eq!(ctx.subscriber_count(), before);
    }

    #[test]
    fn composed_with_empty_source_is_blank() {
        let ctx = context();
        let composed = ctx.value("", "").format([LocalizedValue::constant("x")]);
        assert!(composed.is_empty());
        assert_eq!(composed.text().unwrap(), "");
    }

    #[test]
    fn format_text_with_plain_args() {
        let ctx = context();
        let greet = ctx.value("Dialogs", "Greet");
        assert_eq!(greet.format_text(&["there"]).unwrap(), "Hello there");
    }

    #[test]
    fn observers_receive_new_text() {
        let ctx = context();
        let title = ctx.value("Dialogs", "Title");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let _sub = title.observe(move |text| seen_clone.lock().push(text.to_string()));

        ctx.set_culture("fr").unwrap();
        ctx.set_culture("fr").unwrap();
        ctx.set_culture("en").unwrap();
        assert_eq!(*seen.lock(), vec!["Bonjour", "Hello"]);
    }

    #[test]
    fn observer_not_called_when_text_unchanged() {
        let ctx = context();
        let constant_like = ctx.value("Names", "World");
        let count = Arc::new(AtomicU32::new(0));
        let count_clone = Arc::clone(&count);
        let _sub = constant_like.observe(move |_| {
            count_clone.fetch_add(1, AtomicOrdering::SeqCst);
        });
        // "de" falls back to "#World", which is a change.
        ctx.set_culture("de").unwrap();
        // "es" also falls back to "#World": same text, no notification.
        ctx.set_culture("es").unwrap();
        assert_eq!(count.load(AtomicOrdering::SeqCst), 1);
        assert_eq!(constant_like.version(), 1);
    }

    #[test]
    fn dropping_text_subscription_stops_callbacks() {
        let ctx = context();
        let title = ctx.value("Dialogs", "Title");
        let count = Arc::new(AtomicU32::new(0));
        let count_clone = Arc::clone(&count);
        let sub = title.observe(move |_| {
            count_clone.fetch_add(1, AtomicOrdering::SeqCst);
        });
        ctx.set_culture("fr").unwrap();
        drop(sub);
        ctx.set_culture("en").unwrap();
        assert_eq!(count.load(AtomicOrdering::SeqCst), 1);
        assert_eq!(title.observer_count(), 0);
    }

    #[test]
    fn dispose_unsubscribes_and_blocks_reads() {
        let ctx = context();
        let title = ctx.value("Dialogs", "Title");
        assert_eq!(ctx.subscriber_count(), 1);

        title.dispose();
        title.dispose();
        assert!(title.is_disposed());
        assert_eq!(ctx.subscriber_count(), 0);
        assert!(matches!(title.text(), Err(LocaleError::Disposed(_))));
        assert_eq!(title.to_string(), "");

        let change = ctx.set_culture("fr").unwrap();
        assert_eq!(change.notified, 0);
    }

    #[test]
    fn dispose_affects_clones() {
        let ctx = context();
        let title = ctx.value("Dialogs", "Title");
        let clone = title.clone();
        title.dispose();
        assert!(clone.is_disposed());
    }

    #[test]
    fn drop_unsubscribes() {
        let ctx = context();
        {
            let _title = ctx.value("Dialogs", "Title");
            let _greet = ctx.value("Dialogs", "Greet");
            assert_eq!(ctx.subscriber_count(), 2);
        }
        assert_eq!(ctx.subscriber_count(), 0);
    }

    #[test]
    fn equality_by_identity_and_text() {
        let ctx = context();
        assert_eq!(ctx.value("Dialogs", "Title"), ctx.value("dialogs", "TITLE"));
        assert_ne!(ctx.value("Dialogs", "Title"), ctx.value("Dialogs", "Greet"));
        assert_eq!(LocalizedValue::constant("a"), LocalizedValue::constant("a"));
        assert_ne!(LocalizedValue::constant("a"), LocalizedValue::constant("A"));
        // Different variants are never equal, even with matching text.
        assert_ne!(ctx.value("Dialogs", "Title"), LocalizedValue::constant("Hello"));
    }

    #[test]
    fn ordering_places_constants_last() {
        let ctx = context();
        let mut values = vec![
            LocalizedValue::constant("b"),
            ctx.value("Names", "World"),
            LocalizedValue::constant("a"),
            ctx.value("Dialogs", "Title"),
            ctx.value("Dialogs", "Greet"),
        ];
        values.sort();
        let described: Vec<String> = values.iter().map(LocalizedValue::describe).collect();
        assert_eq!(
            described,
            vec![
                "Dialogs:Greet",
                "Dialogs:Title",
                "Names:World",
                "constant \"a\"",
                "constant \"b\"",
            ]
        );

        let set: BTreeSet<LocalizedValue> = [ctx.value("Dialogs", "Title"), ctx.value("DIALOGS", "title")]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn debug_format() {
        let ctx = context();
        let title = ctx.value("Dialogs", "Title");
        let _ = title.text();
        let dbg = format!("{title:?}");
        assert!(dbg.contains("LocalizedValue"));
        assert!(dbg.contains("Dialogs:Title"));
        assert!(dbg.contains("Hello"));
    }
}
