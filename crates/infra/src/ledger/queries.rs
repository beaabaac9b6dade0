use chrono::Utc;
use serde_json::Value as JsonValue;

use stockledger_core::{DomainError, OrderId, ProductId};
use stockledger_events::{EventBus, EventEnvelope};
use stockledger_inventory::Stock;
use stockledger_products::Product;
use stockledger_sales::Order;

use super::InventoryLedger;
use crate::error::LedgerResult;
use crate::reports::InventoryReport;
use crate::store::Store;

/// Read side. Everything here sees committed data only.
impl<S, B> InventoryLedger<S, B>
where
    S: Store,
    B: EventBus<EventEnvelope<JsonValue>>,
{
    pub fn get_product(&self, product_id: ProductId) -> LedgerResult<Product> {
        self.store
            .read(|t| t.products.find_by_id(&product_id).cloned())?
            .ok_or_else(|| DomainError::not_found("product", product_id).into())
    }

    pub fn list_products(&self) -> LedgerResult<Vec<Product>> {
        Ok(self.store.read(|t| t.products.to_vec())?)
    }

    /// Stock record for a product. Distinguishes an unknown product from a
    /// known product that has no stock yet.
    pub fn get_stock(&self, product_id: ProductId) -> LedgerResult<Stock> {
        let (known, stock) = self.store.read(|t| {
            (
                t.products.exists_by_id(&product_id),
                t.stock_for_product(product_id).cloned(),
            )
        })?;
        if !known {
            return Err(DomainError::not_found("product", product_id).into());
        }
        stock.ok_or_else(|| DomainError::not_found("stock", product_id).into())
    }

    pub fn list_stock(&self) -> LedgerResult<Vec<Stock>> {
        Ok(self.store.read(|t| t.stock.to_vec())?)
    }

    pub fn get_order(&self, order_id: OrderId) -> LedgerResult<Order> {
        self.store
            .read(|t| t.orders.find_by_id(&order_id).cloned())?
            .ok_or_else(|| DomainError::not_found("order", order_id).into())
    }

    pub fn list_orders(&self) -> LedgerResult<Vec<Order>> {
        Ok(self.store.read(|t| t.orders.to_vec())?)
    }

    pub fn inventory_report(&self) -> LedgerResult<InventoryReport> {
        let generated_at = Utc::now();
        Ok(self
            .store
            .read(|t| InventoryReport::build(t, generated_at))?)
    }
}
