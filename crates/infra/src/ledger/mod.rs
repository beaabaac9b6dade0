//! Inventory ledger: the only writer of stock quantities.
//!
//! Every operation runs as one store transaction. Stock records and the
//! product `stock_level` mirror are written together, so they commit or roll
//! back together. Events are collected while the transaction runs and handed
//! to the bus only after it commits; a publish failure is logged and never
//! undoes the write.

mod catalog;
mod orders;
mod queries;
mod reporting;
mod stock;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use stockledger_core::{DomainError, DomainResult, ProductId};
use stockledger_events::{Event, EventBus, EventEnvelope};
use stockledger_inventory::{DEFAULT_REORDER_LEVEL, InventoryEvent, Stock};
use stockledger_products::Product;
use stockledger_sales::SalesEvent;

use crate::error::LedgerResult;
use crate::store::{Store, Tables, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Reorder level applied when a caller supplies none (or a negative one).
    pub default_reorder_level: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_reorder_level: DEFAULT_REORDER_LEVEL,
        }
    }
}

/// Inventory write path and read surface.
///
/// Generic over the record store and the event bus, like any other
/// application service: tests use [`crate::store::InMemoryStore`] and
/// `InMemoryEventBus`.
#[derive(Debug)]
pub struct InventoryLedger<S, B> {
    store: Arc<S>,
    bus: B,
    config: LedgerConfig,
    sequence: AtomicU64,
}

impl<S, B> InventoryLedger<S, B> {
    pub fn new(store: Arc<S>, bus: B, config: LedgerConfig) -> Self {
        Self {
            store,
            bus,
            config,
            sequence: AtomicU64::new(0),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

impl<S, B> InventoryLedger<S, B>
where
    S: Store,
    B: EventBus<EventEnvelope<JsonValue>>,
{
    /// Commit `tx`, returning its events stamped with sequence numbers.
    ///
    /// Numbers are taken before the commit, while the transaction still
    /// excludes every other writer, so sequence order is commit order. A
    /// commit that fails after stamping leaves a gap; numbers are increasing,
    /// not dense.
    fn commit_with<'s>(
        &'s self,
        tx: S::Tx<'s>,
        outbox: Outbox,
    ) -> LedgerResult<Vec<(u64, Recorded)>> {
        let stamped = outbox
            .entries
            .into_iter()
            .map(|recorded| (self.sequence.fetch_add(1, Ordering::Relaxed) + 1, recorded))
            .collect();
        tx.commit()?;
        Ok(stamped)
    }

    /// Hand committed events to the bus, in the order they were recorded.
    fn publish(&self, stamped: Vec<(u64, Recorded)>) {
        for (sequence, recorded) in stamped {
            let envelope = match &recorded {
                Recorded::Inventory(event) => {
                    if let InventoryEvent::LowStockDetected(low) = event {
                        tracing::warn!(
                            product_id = %low.product_id,
                            quantity = low.quantity,
                            reorder_level = low.reorder_level,
                            "stock at or below reorder level"
                        );
                    }
                    envelope_for(sequence, event)
                }
                Recorded::Sales(event) => envelope_for(sequence, event),
            };

            let Some(envelope) = envelope else { continue };
            if let Err(err) = self.bus.publish(envelope) {
                tracing::warn!(error = %err, sequence, "event publish failed after commit");
            }
        }
    }
}

fn envelope_for<E>(sequence: u64, event: &E) -> Option<EventEnvelope<JsonValue>>
where
    E: Event + serde::Serialize,
{
    match EventEnvelope::from_event(sequence, event) {
        Ok(envelope) => Some(envelope),
        Err(err) => {
            tracing::warn!(error = %err, event_type = event.event_type(), "event serialization failed");
            None
        }
    }
}

/// An event waiting for its transaction to commit.
#[derive(Debug)]
enum Recorded {
    Inventory(InventoryEvent),
    Sales(SalesEvent),
}

/// Events recorded during one transaction.
#[derive(Debug, Default)]
struct Outbox {
    entries: Vec<Recorded>,
}

impl Outbox {
    fn inventory(&mut self, event: InventoryEvent) {
        self.entries.push(Recorded::Inventory(event));
    }

    fn sales(&mut self, event: SalesEvent) {
        self.entries.push(Recorded::Sales(event));
    }

    /// Record the low-stock signal if `stock` is at or below its reorder level.
    fn low_stock_check(&mut self, stock: &Stock, at: DateTime<Utc>) {
        if let Some(event) = InventoryEvent::low_stock(stock, at) {
            self.inventory(event);
        }
    }
}

/// Load a product and its stock record, both required.
fn load_pair(tables: &Tables, product_id: ProductId) -> DomainResult<(Product, Stock)> {
    let product = tables
        .products
        .find_by_id(&product_id)
        .cloned()
        .ok_or_else(|| DomainError::not_found("product", product_id))?;
    let stock = tables
        .stock_for_product(product_id)
        .cloned()
        .ok_or_else(|| DomainError::not_found("stock", product_id))?;
    Ok((product, stock))
}

/// Persist a product and its stock record together.
fn save_pair(tables: &mut Tables, product: Product, stock: Stock) {
    tables.products.save(product);
    tables.stock.save(stock);
}
