use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{
    CustomerId, DomainError, DomainResult, Entity, OrderId, OrderItemId, ProductId,
};
use stockledger_products::Product;

use crate::status::OrderStatus;

/// A requested order line: which product, how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl OrderLine {
    pub fn new(product_id: ProductId, quantity: i64) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// A placed order line with its price snapshot.
///
/// Immutable once created: later price changes on the product never reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    id: OrderItemId,
    product_id: ProductId,
    quantity: i64,
    /// Unit price in smallest currency unit, captured when the order was placed.
    price_at_order: u64,
}

impl OrderItem {
    /// Build an item for `product`, snapshotting its current price.
    pub fn for_product(product: &Product, quantity: i64) -> DomainResult<Self> {
        if quantity < 1 {
            return Err(DomainError::validation(format!(
                "order quantity must be at least 1 (got {quantity})"
            )));
        }
        Ok(Self {
            id: OrderItemId::new(),
            product_id: product.id_typed(),
            quantity,
            price_at_order: product.price(),
        })
    }

    pub fn id(&self) -> OrderItemId {
        self.id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn price_at_order(&self) -> u64 {
        self.price_at_order
    }

    pub fn line_total(&self) -> u64 {
        self.price_at_order
            .saturating_mul(u64::try_from(self.quantity).unwrap_or(0))
    }
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    items: Vec<OrderItem>,
    order_date: DateTime<Utc>,
    status: OrderStatus,
}

impl Order {
    /// Place a new order. Starts in `PENDING`.
    pub fn place(
        id: OrderId,
        customer_id: CustomerId,
        items: Vec<OrderItem>,
        order_date: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if items.is_empty() {
            return Err(DomainError::validation("an order needs at least one item"));
        }
        Ok(Self {
            id,
            customer_id,
            items,
            order_date,
            status: OrderStatus::Pending,
        })
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Still holding stock (not delivered, not cancelled).
    pub fn is_open(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Σ price_at_order × quantity. Derived, never stored.
    pub fn total_amount(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |acc, item| acc.saturating_add(item.line_total()))
    }

    /// Move to `next`, returning the previous status.
    pub fn change_status(&mut self, next: OrderStatus) -> DomainResult<OrderStatus> {
        let previous = self.status;
        self.status = previous.transition(next)?;
        Ok(previous)
    }
}

impl Entity for Order {
    type Id = OrderId;
    const KIND: &'static str = "order";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
