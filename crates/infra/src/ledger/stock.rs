use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use stockledger_core::{DomainError, ProductId, StockId};
use stockledger_events::{EventBus, EventEnvelope};
use stockledger_inventory::{
    AdjustmentReason, InventoryEvent, QuantitySet, ReorderLevelSet, Stock, resolve_reorder_level,
};
use stockledger_products::{Product, ProductDetails};

use super::{InventoryLedger, Outbox, load_pair, save_pair};
use crate::error::LedgerResult;
use crate::store::{Store, Tables};

impl<S, B> InventoryLedger<S, B>
where
    S: Store,
    B: EventBus<EventEnvelope<JsonValue>>,
{
    /// Register a product with opening stock.
    ///
    /// A product with the same name is not duplicated: its stock receives
    /// `initial_quantity` instead, as with [`Self::initialize_stock`].
    pub fn register_product(
        &self,
        details: ProductDetails,
        initial_quantity: i64,
        reorder_level: Option<i64>,
    ) -> LedgerResult<Product> {
        let details = details.validated()?;
        ensure_non_negative_quantity(initial_quantity)?;

        let now = Utc::now();
        let mut outbox = Outbox::default();
        let mut tx = self.store.begin()?;

        let existing = tx.product_by_name(&details.name).cloned();
        let product = match existing {
            Some(mut existing) => {
                tracing::info!(
                    product_id = %existing.id_typed(),
                    name = existing.name(),
                    "product already registered, receiving stock"
                );
                self.receive_into(&mut tx, &mut existing, initial_quantity, reorder_level, now, &mut outbox)?;
                existing
            }
            None => {
                let mut product = Product::create(ProductId::new(), details)?;
                let level = resolve_reorder_level(reorder_level, self.config.default_reorder_level);
                let stock = Stock::open(StockId::new(), &mut product, initial_quantity, level)?;
                outbox.inventory(InventoryEvent::initialized(&stock, now));
                outbox.low_stock_check(&stock, now);
                save_pair(&mut tx, product.clone(), stock);
                product
            }
        };

        let stamped = self.commit_with(tx, outbox)?;
        tracing::info!(
            product_id = %product.id_typed(),
            stock_level = product.stock_level(),
            "product registered"
        );
        self.publish(stamped);
        Ok(product)
    }

    /// Receive opening (or additional) stock for an existing product.
    ///
    /// Additive when a stock record exists; creates one otherwise. The reorder
    /// level is only overwritten when a non-negative one is supplied.
    pub fn initialize_stock(
        &self,
        product_id: ProductId,
        initial_quantity: i64,
        reorder_level: Option<i64>,
    ) -> LedgerResult<Product> {
        ensure_non_negative_quantity(initial_quantity)?;

        let now = Utc::now();
        let mut outbox = Outbox::default();
        let mut tx = self.store.begin()?;

        let mut product = tx
            .products
            .find_by_id(&product_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("product", product_id))?;
        self.receive_into(&mut tx, &mut product, initial_quantity, reorder_level, now, &mut outbox)?;

        let stamped = self.commit_with(tx, outbox)?;
        tracing::info!(
            %product_id,
            received = initial_quantity,
            stock_level = product.stock_level(),
            "stock initialized"
        );
        self.publish(stamped);
        Ok(product)
    }

    /// Open a stock record for a product that has none.
    pub fn create_stock(
        &self,
        product_id: ProductId,
        quantity: i64,
        reorder_level: Option<i64>,
    ) -> LedgerResult<Stock> {
        let now = Utc::now();
        let mut outbox = Outbox::default();
        let mut tx = self.store.begin()?;

        let mut product = tx
            .products
            .find_by_id(&product_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("product", product_id))?;
        if tx.stock_for_product(product_id).is_some() {
            return Err(DomainError::conflict(format!(
                "stock already exists for product {product_id}"
            ))
            .into());
        }

        let level = reorder_level.unwrap_or(self.config.default_reorder_level);
        let stock = Stock::open(StockId::new(), &mut product, quantity, level)?;
        outbox.inventory(InventoryEvent::initialized(&stock, now));
        outbox.low_stock_check(&stock, now);
        save_pair(&mut tx, product, stock.clone());

        let stamped = self.commit_with(tx, outbox)?;
        tracing::info!(%product_id, quantity, "stock created");
        self.publish(stamped);
        Ok(stock)
    }

    /// Apply a signed delta to a product's stock. Returns the new quantity.
    ///
    /// Fails with `InsufficientStock` (and changes nothing) if the result would
    /// be negative. Landing at or below the reorder level raises the low-stock
    /// signal without blocking.
    pub fn adjust_quantity(&self, product_id: ProductId, delta: i64) -> LedgerResult<i64> {
        let now = Utc::now();
        let mut outbox = Outbox::default();
        let mut tx = self.store.begin()?;

        let (mut product, mut stock) = load_pair(&tx, product_id)?;
        let new_quantity = match stock.adjust(&mut product, delta) {
            Ok(quantity) => quantity,
            Err(err) => {
                tracing::warn!(
                    %product_id,
                    delta,
                    available = stock.quantity(),
                    error = %err,
                    "stock adjustment rejected"
                );
                return Err(err.into());
            }
        };

        if delta != 0 {
            outbox.inventory(InventoryEvent::adjusted(&stock, delta, AdjustmentReason::Manual, now));
        }
        outbox.low_stock_check(&stock, now);
        save_pair(&mut tx, product, stock);

        let stamped = self.commit_with(tx, outbox)?;
        tracing::info!(%product_id, delta, new_quantity, "stock adjusted");
        self.publish(stamped);
        Ok(new_quantity)
    }

    /// Overwrite the quantity on hand.
    pub fn set_absolute_quantity(&self, product_id: ProductId, quantity: i64) -> LedgerResult<Stock> {
        self.update_stock(product_id, Some(quantity), None)
    }

    pub fn set_reorder_level(&self, product_id: ProductId, reorder_level: i64) -> LedgerResult<Stock> {
        self.update_stock(product_id, None, Some(reorder_level))
    }

    /// Overwrite quantity and/or reorder level in one transaction.
    ///
    /// Negative values fail with `InvalidAdjustment`; either both changes
    /// commit or neither does.
    pub fn update_stock(
        &self,
        product_id: ProductId,
        quantity: Option<i64>,
        reorder_level: Option<i64>,
    ) -> LedgerResult<Stock> {
        let now = Utc::now();
        let mut outbox = Outbox::default();
        let mut tx = self.store.begin()?;

        let (mut product, mut stock) = load_pair(&tx, product_id)?;

        if let Some(quantity) = quantity {
            let previous = stock.quantity();
            stock.set_quantity(&mut product, quantity)?;
            outbox.inventory(InventoryEvent::QuantitySet(QuantitySet {
                stock_id: stock.id_typed(),
                product_id,
                previous,
                quantity,
                occurred_at: now,
            }));
        }
        if let Some(level) = reorder_level {
            let previous = stock.reorder_level();
            stock.set_reorder_level(level)?;
            outbox.inventory(reorder_level_set(&stock, previous, now));
        }
        if quantity.is_some() || reorder_level.is_some() {
            outbox.low_stock_check(&stock, now);
        }
        save_pair(&mut tx, product, stock.clone());

        let stamped = self.commit_with(tx, outbox)?;
        tracing::info!(
            %product_id,
            quantity = stock.quantity(),
            reorder_level = stock.reorder_level(),
            "stock updated"
        );
        self.publish(stamped);
        Ok(stock)
    }

    /// Additive receipt into `product`'s stock, opening a record if needed.
    fn receive_into(
        &self,
        tables: &mut Tables,
        product: &mut Product,
        quantity: i64,
        reorder_level: Option<i64>,
        now: DateTime<Utc>,
        outbox: &mut Outbox,
    ) -> LedgerResult<()> {
        let stock = match tables.stock_for_product(product.id_typed()).cloned() {
            Some(mut stock) => {
                stock.receive(product, quantity)?;
                outbox.inventory(InventoryEvent::adjusted(&stock, quantity, AdjustmentReason::Receipt, now));
                if let Some(level) = reorder_level.filter(|level| *level >= 0) {
                    let previous = stock.reorder_level();
                    stock.set_reorder_level(level)?;
                    outbox.inventory(reorder_level_set(&stock, previous, now));
                }
                stock
            }
            None => {
                let level = resolve_reorder_level(reorder_level, self.config.default_reorder_level);
                let stock = Stock::open(StockId::new(), product, quantity, level)?;
                outbox.inventory(InventoryEvent::initialized(&stock, now));
                stock
            }
        };
        outbox.low_stock_check(&stock, now);
        save_pair(tables, product.clone(), stock);
        Ok(())
    }
}

fn ensure_non_negative_quantity(quantity: i64) -> Result<(), DomainError> {
    if quantity < 0 {
        return Err(DomainError::invalid_adjustment(format!(
            "initial quantity cannot be negative (got {quantity})"
        )));
    }
    Ok(())
}

fn reorder_level_set(stock: &Stock, previous: i64, at: DateTime<Utc>) -> InventoryEvent {
    InventoryEvent::ReorderLevelSet(ReorderLevelSet {
        stock_id: stock.id_typed(),
        product_id: stock.product_id(),
        previous,
        reorder_level: stock.reorder_level(),
        occurred_at: at,
    })
}
