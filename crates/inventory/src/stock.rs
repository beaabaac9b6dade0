use serde::{Deserialize, Serialize};

use stockledger_core::{DomainError, DomainResult, Entity, ProductId, StockId};
use stockledger_products::Product;

/// Reorder level used when none (or a negative one) is supplied.
pub const DEFAULT_REORDER_LEVEL: i64 = 5;

/// Pick the effective reorder level: the requested one if present and
/// non-negative, otherwise `default`.
pub fn resolve_reorder_level(requested: Option<i64>, default: i64) -> i64 {
    match requested {
        Some(level) if level >= 0 => level,
        _ => default,
    }
}

/// Quantity-on-hand for one product.
///
/// `product_id` is fixed at creation; there is no way to re-point a stock
/// record at another product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    id: StockId,
    product_id: ProductId,
    quantity: i64,
    reorder_level: i64,
}

impl Stock {
    /// Open a stock record for `product` and mirror its quantity.
    pub fn open(
        id: StockId,
        product: &mut Product,
        quantity: i64,
        reorder_level: i64,
    ) -> DomainResult<Self> {
        if quantity < 0 {
            return Err(DomainError::invalid_adjustment(format!(
                "initial quantity cannot be negative (got {quantity})"
            )));
        }
        if reorder_level < 0 {
            return Err(DomainError::invalid_adjustment(format!(
                "reorder level cannot be negative (got {reorder_level})"
            )));
        }

        let stock = Self {
            id,
            product_id: product.id_typed(),
            quantity,
            reorder_level,
        };
        stock.mirror(product);
        Ok(stock)
    }

    pub fn id_typed(&self) -> StockId {
        self.id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn reorder_level(&self) -> i64 {
        self.reorder_level
    }

    /// At or below the reorder level.
    pub fn is_low(&self) -> bool {
        self.quantity <= self.reorder_level
    }

    /// Write this record's quantity onto the product's `stock_level`.
    pub fn mirror(&self, product: &mut Product) {
        product.set_stock_level(self.quantity);
    }

    /// Book a receipt of `quantity` units (additive). Returns the new quantity.
    pub fn receive(&mut self, product: &mut Product, quantity: i64) -> DomainResult<i64> {
        if quantity < 0 {
            return Err(DomainError::invalid_adjustment(format!(
                "received quantity cannot be negative (got {quantity})"
            )));
        }
        self.adjust(product, quantity)
    }

    /// Apply a signed delta. Returns the new quantity.
    ///
    /// A result below zero fails with `InsufficientStock` and leaves both the
    /// record and the product untouched.
    pub fn adjust(&mut self, product: &mut Product, delta: i64) -> DomainResult<i64> {
        self.ensure_owner(product)?;

        let new_quantity = self
            .quantity
            .checked_add(delta)
            .ok_or_else(|| DomainError::invalid_adjustment("quantity overflow"))?;

        if new_quantity < 0 {
            return Err(DomainError::insufficient_stock(
                self.product_id,
                product.name(),
                self.quantity,
                delta.saturating_neg(),
            ));
        }

        self.quantity = new_quantity;
        self.mirror(product);
        Ok(new_quantity)
    }

    /// Take `requested` units out for an order line.
    pub fn withdraw(&mut self, product: &mut Product, requested: i64) -> DomainResult<i64> {
        if requested < 1 {
            return Err(DomainError::validation(format!(
                "requested quantity must be at least 1 (got {requested})"
            )));
        }
        self.adjust(product, -requested)
    }

    /// Administrative overwrite of the quantity.
    pub fn set_quantity(&mut self, product: &mut Product, quantity: i64) -> DomainResult<()> {
        self.ensure_owner(product)?;
        if quantity < 0 {
            return Err(DomainError::invalid_adjustment(format!(
                "quantity cannot be negative (got {quantity})"
            )));
        }
        self.quantity = quantity;
        self.mirror(product);
        Ok(())
    }

    pub fn set_reorder_level(&mut self, reorder_level: i64) -> DomainResult<()> {
        if reorder_level < 0 {
            return Err(DomainError::invalid_adjustment(format!(
                "reorder level cannot be negative (got {reorder_level})"
            )));
        }
        self.reorder_level = reorder_level;
        Ok(())
    }

    fn ensure_owner(&self, product: &Product) -> DomainResult<()> {
        if product.id_typed() != self.product_id {
            return Err(DomainError::validation(format!(
                "stock {} belongs to product {}, not {}",
                self.id,
                self.product_id,
                product.id_typed()
            )));
        }
        Ok(())
    }
}

impl Entity for Stock {
    type Id = StockId;
    const KIND: &'static str = "stock";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
