//! Customer orders domain module.
//!
//! An [`Order`] owns its [`OrderItem`]s by value. Each item captures the
//! product's price at order time. Status changes go through the
//! [`OrderStatus`] state machine; nothing here touches stock (the ledger does).

pub mod events;
pub mod order;
pub mod status;

pub use events::{OrderDeleted, OrderPlaced, OrderStatusChanged, PlacedLine, SalesEvent};
pub use order::{Order, OrderItem, OrderLine};
pub use status::OrderStatus;
