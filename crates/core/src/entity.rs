//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Persisted records (products, stock, orders, parties) are keyed by their
/// identifier; the store uses `id()` to decide where a saved value lands.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Ord + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Human-readable entity name used in error messages (e.g. "product").
    const KIND: &'static str;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
