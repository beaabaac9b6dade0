use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stockledger_core::{ProductId, StockId};
use stockledger_events::Event;

use crate::stock::Stock;

/// Why a quantity moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentReason {
    /// Stock receipt (registration of an existing product, explicit initialization).
    Receipt,
    /// Manual signed adjustment.
    Manual,
    /// Decrement for an order line.
    OrderPlaced,
    /// Restock from a cancelled or deleted order.
    OrderReversed,
}

/// Event: StockInitialized (a new stock record was opened).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInitialized {
    pub stock_id: StockId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub reorder_level: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockAdjusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjusted {
    pub stock_id: StockId,
    pub product_id: ProductId,
    pub delta: i64,
    pub new_quantity: i64,
    pub reason: AdjustmentReason,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuantitySet (administrative overwrite).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantitySet {
    pub stock_id: StockId,
    pub product_id: ProductId,
    pub previous: i64,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ReorderLevelSet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderLevelSet {
    pub stock_id: StockId,
    pub product_id: ProductId,
    pub previous: i64,
    pub reorder_level: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LowStockDetected (advisory; never blocks the write that caused it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockDetected {
    pub stock_id: StockId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub reorder_level: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockRemoved (cascade from product deletion).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRemoved {
    pub stock_id: StockId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryEvent {
    StockInitialized(StockInitialized),
    StockAdjusted(StockAdjusted),
    QuantitySet(QuantitySet),
    ReorderLevelSet(ReorderLevelSet),
    LowStockDetected(LowStockDetected),
    StockRemoved(StockRemoved),
}

impl InventoryEvent {
    pub fn initialized(stock: &Stock, occurred_at: DateTime<Utc>) -> Self {
        Self::StockInitialized(StockInitialized {
            stock_id: stock.id_typed(),
            product_id: stock.product_id(),
            quantity: stock.quantity(),
            reorder_level: stock.reorder_level(),
            occurred_at,
        })
    }

    pub fn adjusted(
        stock: &Stock,
        delta: i64,
        reason: AdjustmentReason,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self::StockAdjusted(StockAdjusted {
            stock_id: stock.id_typed(),
            product_id: stock.product_id(),
            delta,
            new_quantity: stock.quantity(),
            reason,
            occurred_at,
        })
    }

    /// The low-stock signal for `stock`, if it is at or below its reorder level.
    pub fn low_stock(stock: &Stock, occurred_at: DateTime<Utc>) -> Option<Self> {
        stock.is_low().then(|| {
            Self::LowStockDetected(LowStockDetected {
                stock_id: stock.id_typed(),
                product_id: stock.product_id(),
                quantity: stock.quantity(),
                reorder_level: stock.reorder_level(),
                occurred_at,
            })
        })
    }

    pub fn stock_id(&self) -> StockId {
        match self {
            InventoryEvent::StockInitialized(e) => e.stock_id,
            InventoryEvent::StockAdjusted(e) => e.stock_id,
            InventoryEvent::QuantitySet(e) => e.stock_id,
            InventoryEvent::ReorderLevelSet(e) => e.stock_id,
            InventoryEvent::LowStockDetected(e) => e.stock_id,
            InventoryEvent::StockRemoved(e) => e.stock_id,
        }
    }

    pub fn product_id(&self) -> ProductId {
        match self {
            InventoryEvent::StockInitialized(e) => e.product_id,
            InventoryEvent::StockAdjusted(e) => e.product_id,
            InventoryEvent::QuantitySet(e) => e.product_id,
            InventoryEvent::ReorderLevelSet(e) => e.product_id,
            InventoryEvent::LowStockDetected(e) => e.product_id,
            InventoryEvent::StockRemoved(e) => e.product_id,
        }
    }
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::StockInitialized(_) => "inventory.stock.initialized",
            InventoryEvent::StockAdjusted(_) => "inventory.stock.adjusted",
            InventoryEvent::QuantitySet(_) => "inventory.stock.quantity_set",
            InventoryEvent::ReorderLevelSet(_) => "inventory.stock.reorder_level_set",
            InventoryEvent::LowStockDetected(_) => "inventory.stock.low",
            InventoryEvent::StockRemoved(_) => "inventory.stock.removed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InventoryEvent::StockInitialized(e) => e.occurred_at,
            InventoryEvent::StockAdjusted(e) => e.occurred_at,
            InventoryEvent::QuantitySet(e) => e.occurred_at,
            InventoryEvent::ReorderLevelSet(e) => e.occurred_at,
            InventoryEvent::LowStockDetected(e) => e.occurred_at,
            InventoryEvent::StockRemoved(e) => e.occurred_at,
        }
    }

    fn aggregate_type(&self) -> &'static str {
        "inventory.stock"
    }

    fn aggregate_id(&self) -> Uuid {
        *self.stock_id().as_uuid()
    }
}
