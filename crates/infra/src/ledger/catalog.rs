use chrono::Utc;
use serde_json::Value as JsonValue;

use stockledger_core::{DomainError, ProductId};
use stockledger_events::{EventBus, EventEnvelope};
use stockledger_inventory::{InventoryEvent, StockRemoved};
use stockledger_products::{Product, ProductDetails};

use super::{InventoryLedger, Outbox};
use crate::error::LedgerResult;
use crate::store::{Store, Transaction};

impl<S, B> InventoryLedger<S, B>
where
    S: Store,
    B: EventBus<EventEnvelope<JsonValue>>,
{
    /// Replace a product's name, description and price. Quantity is untouched.
    pub fn update_product_details(
        &self,
        product_id: ProductId,
        details: ProductDetails,
    ) -> LedgerResult<Product> {
        let details = details.validated()?;
        let mut tx = self.store.begin()?;

        let mut product = tx
            .products
            .find_by_id(&product_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("product", product_id))?;

        let taken = tx
            .product_by_name(&details.name)
            .is_some_and(|other| other.id_typed() != product_id);
        if taken {
            return Err(DomainError::conflict(format!(
                "product name '{}' is already in use",
                details.name
            ))
            .into());
        }

        product.update_details(details)?;
        tx.products.save(product.clone());

        tx.commit()?;
        tracing::info!(%product_id, name = product.name(), price = product.price(), "product updated");
        Ok(product)
    }

    /// Remove a product together with its stock record.
    pub fn delete_product(&self, product_id: ProductId) -> LedgerResult<Product> {
        let mut outbox = Outbox::default();
        let mut tx = self.store.begin()?;

        let product = tx
            .products
            .delete_by_id(&product_id)
            .ok_or_else(|| DomainError::not_found("product", product_id))?;

        let stock_id = tx.stock_for_product(product_id).map(|s| s.id_typed());
        if let Some(stock) = stock_id.and_then(|id| tx.stock.delete_by_id(&id)) {
            outbox.inventory(InventoryEvent::StockRemoved(StockRemoved {
                stock_id: stock.id_typed(),
                product_id,
                quantity: stock.quantity(),
                occurred_at: Utc::now(),
            }));
        }

        let stamped = self.commit_with(tx, outbox)?;
        tracing::info!(%product_id, name = product.name(), "product deleted");
        self.publish(stamped);
        Ok(product)
    }
}
