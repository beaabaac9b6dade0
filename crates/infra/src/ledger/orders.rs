use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use stockledger_core::{CustomerId, DomainError, OrderId, ProductId};
use stockledger_events::{EventBus, EventEnvelope};
use stockledger_inventory::{AdjustmentReason, InventoryEvent};
use stockledger_sales::{
    Order, OrderDeleted, OrderItem, OrderLine, OrderStatus, OrderStatusChanged, SalesEvent,
};

use super::{InventoryLedger, Outbox, load_pair, save_pair};
use crate::error::LedgerResult;
use crate::store::{Store, Tables};

impl<S, B> InventoryLedger<S, B>
where
    S: Store,
    B: EventBus<EventEnvelope<JsonValue>>,
{
    /// Place an order and take its lines out of stock.
    ///
    /// Lines are applied in the given order against the running quantity, so
    /// a product listed twice draws on what the first line left. Any failing
    /// line aborts the whole order: no decrement and no order become visible.
    pub fn fulfill_order(&self, customer_id: CustomerId, lines: &[OrderLine]) -> LedgerResult<Order> {
        if lines.is_empty() {
            return Err(DomainError::validation("an order needs at least one line").into());
        }

        let now = Utc::now();
        let mut outbox = Outbox::default();
        let mut tx = self.store.begin()?;

        if !tx.customers.exists_by_id(&customer_id) {
            return Err(DomainError::not_found("customer", customer_id).into());
        }

        let mut items = Vec::with_capacity(lines.len());
        let mut touched: Vec<ProductId> = Vec::new();

        for line in lines {
            let (mut product, mut stock) = load_pair(&tx, line.product_id)?;
            let item = OrderItem::for_product(&product, line.quantity)?;

            if let Err(err) = stock.withdraw(&mut product, line.quantity) {
                tracing::warn!(
                    %customer_id,
                    product_id = %line.product_id,
                    requested = line.quantity,
                    available = stock.quantity(),
                    "order rejected"
                );
                return Err(err.into());
            }

            outbox.inventory(InventoryEvent::adjusted(
                &stock,
                -line.quantity,
                AdjustmentReason::OrderPlaced,
                now,
            ));
            save_pair(&mut tx, product, stock);
            if !touched.contains(&line.product_id) {
                touched.push(line.product_id);
            }
            items.push(item);
        }

        let order = Order::place(OrderId::new(), customer_id, items, now)?;
        outbox.sales(SalesEvent::placed(&order));
        for product_id in touched {
            if let Some(stock) = tx.stock_for_product(product_id) {
                outbox.low_stock_check(stock, now);
            }
        }
        tx.orders.save(order.clone());

        let stamped = self.commit_with(tx, outbox)?;
        tracing::info!(
            order_id = %order.id_typed(),
            %customer_id,
            items = order.items().len(),
            total_amount = order.total_amount(),
            "order placed"
        );
        self.publish(stamped);
        Ok(order)
    }

    /// Move an order to `next`. Cancellation puts every item back into stock.
    pub fn update_order_status(&self, order_id: OrderId, next: OrderStatus) -> LedgerResult<Order> {
        let now = Utc::now();
        let mut outbox = Outbox::default();
        let mut tx = self.store.begin()?;

        let mut order = tx
            .orders
            .find_by_id(&order_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("order", order_id))?;

        let previous = match order.change_status(next) {
            Ok(previous) => previous,
            Err(err) => {
                tracing::warn!(%order_id, from = %order.status(), to = %next, "status change rejected");
                return Err(err.into());
            }
        };

        let restocked = next == OrderStatus::Cancelled;
        if restocked {
            restock(&mut tx, &order, now, &mut outbox)?;
        }
        outbox.sales(SalesEvent::OrderStatusChanged(OrderStatusChanged {
            order_id,
            from: previous,
            to: next,
            restocked,
            occurred_at: now,
        }));
        tx.orders.save(order.clone());

        let stamped = self.commit_with(tx, outbox)?;
        tracing::info!(%order_id, from = %previous, to = %next, "order status changed");
        self.publish(stamped);
        Ok(order)
    }

    pub fn cancel_order(&self, order_id: OrderId) -> LedgerResult<Order> {
        self.update_order_status(order_id, OrderStatus::Cancelled)
    }

    /// Remove an order. One that still holds stock is restocked first.
    pub fn delete_order(&self, order_id: OrderId) -> LedgerResult<Order> {
        let now = Utc::now();
        let mut outbox = Outbox::default();
        let mut tx = self.store.begin()?;

        let order = tx
            .orders
            .delete_by_id(&order_id)
            .ok_or_else(|| DomainError::not_found("order", order_id))?;

        let restocked = order.is_open();
        if restocked {
            restock(&mut tx, &order, now, &mut outbox)?;
        }
        outbox.sales(SalesEvent::OrderDeleted(OrderDeleted {
            order_id,
            status: order.status(),
            restocked,
            occurred_at: now,
        }));

        let stamped = self.commit_with(tx, outbox)?;
        tracing::info!(%order_id, restocked, "order deleted");
        self.publish(stamped);
        Ok(order)
    }
}

/// Put every item of `order` back into stock.
///
/// Items whose product or stock record is gone are skipped. A restock that
/// still leaves a product at or below its reorder level raises the low-stock
/// signal like any other quantity write.
fn restock(
    tables: &mut Tables,
    order: &Order,
    now: DateTime<Utc>,
    outbox: &mut Outbox,
) -> LedgerResult<()> {
    for item in order.items() {
        let (mut product, mut stock) = match load_pair(tables, item.product_id()) {
            Ok(pair) => pair,
            Err(err) => {
                tracing::warn!(
                    order_id = %order.id_typed(),
                    product_id = %item.product_id(),
                    error = %err,
                    "skipping restock of missing item"
                );
                continue;
            }
        };
        stock.adjust(&mut product, item.quantity())?;
        outbox.inventory(InventoryEvent::adjusted(
            &stock,
            item.quantity(),
            AdjustmentReason::OrderReversed,
            now,
        ));
        outbox.low_stock_check(&stock, now);
        save_pair(tables, product, stock);
    }
    Ok(())
}
