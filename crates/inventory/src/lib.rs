//! Inventory domain module.
//!
//! A [`Stock`] record is the authoritative quantity-on-hand for exactly one
//! product. Every quantity change goes through a `Stock` method that also
//! writes the product's `stock_level` mirror, so the two cannot drift apart.
//! No IO, no storage: the ledger in `stockledger-infra` supplies transactions.

pub mod events;
pub mod stock;

pub use events::{
    AdjustmentReason, InventoryEvent, LowStockDetected, QuantitySet, ReorderLevelSet,
    StockAdjusted, StockInitialized, StockRemoved,
};
pub use stock::{DEFAULT_REORDER_LEVEL, Stock, resolve_reorder_level};
