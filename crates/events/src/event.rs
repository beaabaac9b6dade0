use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A domain event.
///
/// Events are facts: immutable, versioned, and tied to the record they describe.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "inventory.stock.adjusted").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Kind of record the event belongs to (e.g. "inventory.stock").
    fn aggregate_type(&self) -> &'static str;

    /// Identifier of the record the event belongs to.
    fn aggregate_id(&self) -> Uuid;
}
