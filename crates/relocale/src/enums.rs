//! Localized values for enum variants.
//!
//! An [`EnumTable`] maps each variant of any number of enum types to a
//! translation identifier. A [`LocalizedEnumCache`] turns variants into
//! [`LocalizedValue`]s, creating each one once and handing out the same
//! shared handle on every later request.
//!
//! Keys are `(TypeId, variant name)`, so two enum types with identically
//! named variants never collide.

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::context::CultureContext;
use crate::entry::Identifier;
use crate::error::FALLBACK_MARKER;
use crate::value::LocalizedValue;

/// Text of the value returned for a missing enum input.
pub const INVALID_ENUM_TEXT: &str = "#INVALID ENUM#";

static INVALID: LazyLock<LocalizedValue> =
    LazyLock::new(|| LocalizedValue::pinned_constant(INVALID_ENUM_TEXT));

/// The shared value returned for a missing enum input.
///
/// Every call returns a handle to the same value. `dispose()` on it is a
/// no-op.
#[must_use]
pub fn invalid() -> LocalizedValue {
    INVALID.clone()
}

/// An enum whose variants can be localized.
///
/// ```
/// use relocale::LocalizedEnum;
///
/// #[derive(Clone, Copy)]
/// enum Level { Low, High }
///
/// impl LocalizedEnum for Level {
///     fn variant_name(&self) -> &'static str {
///         match self {
///             Level::Low => "Low",
///             Level::High => "High",
///         }
///     }
/// }
/// ```
pub trait LocalizedEnum: Copy + Send + Sync + 'static {
    /// Stable name of this variant, unique within the type.
    fn variant_name(&self) -> &'static str;
}

type VariantKey = (TypeId, &'static str);

fn variant_key<E: LocalizedEnum>(variant: E) -> VariantKey {
    (TypeId::of::<E>(), variant.variant_name())
}

/// Variant-to-identifier mapping.
#[derive(Debug, Clone, Default)]
pub struct EnumTable {
    entries: HashMap<VariantKey, Identifier>,
}

impl EnumTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with<E: LocalizedEnum>(mut self, variant: E, id: Identifier) -> Self {
        self.insert(variant, id);
        self
    }

    /// Map `variant` to `id`, returning the previous mapping.
    pub fn insert<E: LocalizedEnum>(&mut self, variant: E, id: Identifier) -> Option<Identifier> {
        self.entries.insert(variant_key(variant), id)
    }

    #[must_use]
    pub fn identifier<E: LocalizedEnum>(&self, variant: E) -> Option<&Identifier> {
        self.entries.get(&variant_key(variant))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Memoized localized values per enum variant.
///
/// Entries are never evicted; the cache lives as long as its owner.
pub struct LocalizedEnumCache {
    context: Arc<CultureContext>,
    table: EnumTable,
    values: DashMap<VariantKey, LocalizedValue>,
}

impl LocalizedEnumCache {
    #[must_use]
    pub fn new(context: &Arc<CultureContext>, table: EnumTable) -> Self {
        Self {
            context: Arc::clone(context),
            table,
            values: DashMap::new(),
        }
    }

    /// The value for `variant`.
    ///
    /// `None` yields the shared [`invalid`] value. A variant with no table
    /// entry yields the constant `"#<variant name>"`; it is cached like any
    /// other.
    ///
    /// A cached value that a caller disposed is replaced by a fresh one.
    pub fn get_or_create<E: LocalizedEnum>(&self, variant: Option<E>) -> LocalizedValue {
        let Some(variant) = variant else {
            return invalid();
        };
        let key = variant_key(variant);
        if let Some(existing) = self.values.get(&key)
            && !existing.is_disposed()
        {
            return existing.clone();
        }
        let mut slot = self
            .values
            .entry(key)
            .or_insert_with(|| self.create(variant));
        if slot.is_disposed() {
            debug!(
                enum_type = type_name::<E>(),
                variant = variant.variant_name(),
                "replacing disposed localized enum value"
            );
            *slot = self.create(variant);
        }
        slot.clone()
    }

    fn create<E: LocalizedEnum>(&self, variant: E) -> LocalizedValue {
        let name = variant.variant_name();
        match self.table.identifier(variant) {
            Some(id) => {
                debug!(enum_type = type_name::<E>(), variant = name, id = %id, "creating localized enum value");
                LocalizedValue::bound_to(&self.context, id.clone())
            }
            None => {
                warn!(enum_type = type_name::<E>(), variant = name, "enum variant has no translation mapping");
                LocalizedValue::constant(format!("{FALLBACK_MARKER}{name}"))
            }
        }
    }

    #[must_use]
    pub fn table(&self) -> &EnumTable {
        &self.table
    }

    /// Number of cached values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for LocalizedEnumCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalizedEnumCache")
            .field("mapped", &self.table.len())
            .field("cached", &self.values.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CultureConfig;
    use crate::entry::TranslationEntry;
    use tracing_test::traced_test;

    #[derive(Debug, Clone, Copy)]
    enum Color {
        Red,
        Green,
        Blue,
    }

    impl LocalizedEnum for Color {
        fn variant_name(&self) -> &'static str {
            match self {
                Self::Red => "Red",
                Self::Green => "Green",
                Self::Blue => "Blue",
            }
        }
    }

    #[derive(Debug, Clone, Copy)]
    enum Alert {
        Red,
    }

    impl LocalizedEnum for Alert {
        fn variant_name(&self) -> &'static str {
            "Red"
        }
    }

    fn cache() -> (Arc<CultureContext>, LocalizedEnumCache) {
        let ctx = CultureContext::new(CultureConfig::new("en")).unwrap();
        let store = ctx.store();
        store
            .register_all([
                TranslationEntry::new("Colors", "Red")
                    .with_text("en", "Red")
                    .with_text("fr", "Rouge"),
                TranslationEntry::new("Colors", "Green")
                    .with_text("en", "Green")
                    .with_text("fr", "Vert"),
                TranslationEntry::new("Alerts", "Red")
                    .with_text("en", "Critical")
                    .with_text("fr", "Critique"),
            ])
            .unwrap();
        let table = EnumTable::new()
            .with(Color::Red, Identifier::new("Colors", "Red"))
            .with(Color::Green, Identifier::new("Colors", "Green"))
            .with(Alert::Red, Identifier::new("Alerts", "Red"));
        let cache = LocalizedEnumCache::new(&ctx, table);
        (ctx, cache)
    }

    #[test]
    fn mapped_variant_follows_culture() {
        let (ctx, cache) = cache();
        let red = cache.get_or_create(Some(Color::Red));
        assert_eq!(red.text().unwrap(), "Red");
        ctx.set_culture("fr").unwrap();
        assert_eq!(red.text().unwrap(), "Rouge");
    }

    #[test]
    fn repeated_requests_share_one_value() {
        let (_ctx, cache) = cache();
        let a = cache.get_or_create(Some(Color::Green));
        let b = cache.get_or_create(Some(Color::Green));
        assert!(LocalizedValue::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn same_variant_name_in_different_types_is_distinct() {
        let (_ctx, cache) = cache();
        let color = cache.get_or_create(Some(Color::Red));
        let alert = cache.get_or_create(Some(Alert::Red));
        assert!(!LocalizedValue::ptr_eq(&color, &alert));
        assert_eq!(color.text().unwrap(), "Red");
        assert_eq!(alert.text().unwrap(), "Critical");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn missing_input_returns_invalid_singleton() {
        let (_ctx, cache) = cache();
        let a = cache.get_or_create::<Color>(None);
        let b = cache.get_or_create::<Alert>(None);
        assert!(LocalizedValue::ptr_eq(&a, &b));
        assert_eq!(a.text().unwrap(), INVALID_ENUM_TEXT);
        assert!(cache.is_empty());
    }

    #[test]
    fn disposed_value_is_recreated() {
        let (ctx, cache) = cache();
        let first = cache.get_or_create(Some(Color::Red));
        first.dispose();

        let second = cache.get_or_create(Some(Color::Red));
        assert!(!LocalizedValue::ptr_eq(&first, &second));
        assert_eq!(second.text().unwrap(), "Red");
        ctx.set_culture("fr").unwrap();
        assert_eq!(second.text().unwrap(), "Rouge");
        assert_eq!(cache.len(), 1);
        assert!(LocalizedValue::ptr_eq(&second, &cache.get_or_create(Some(Color::Red))));
    }

    #[test]
    fn invalid_survives_dispose() {
        let (_ctx, cache) = cache();
        cache.get_or_create::<Color>(None).dispose();
        let again = cache.get_or_create::<Alert>(None);
        assert!(!again.is_disposed());
        assert_eq!(again.text().unwrap(), INVALID_ENUM_TEXT);
    }

    #[test]
    #[traced_test]
    fn unmapped_variant_yields_marked_name() {
        let (ctx, cache) = cache();
        let blue = cache.get_or_create(Some(Color::Blue));
        assert_eq!(blue.text().unwrap(), "#Blue");
        assert!(logs_contain("enum variant has no translation mapping"));
        ctx.set_culture("fr").unwrap();
        assert_eq!(blue.text().unwrap(), "#Blue");
        assert!(LocalizedValue::ptr_eq(&blue, &cache.get_or_create(Some(Color::Blue))));
    }

    #[test]
    fn table_lookup() {
        let (_ctx, cache) = cache();
        let table = cache.table();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.identifier(Alert::Red),
            Some(&Identifier::new("Alerts", "Red"))
        );
        assert!(table.identifier(Color::Blue).is_none());
    }
}
