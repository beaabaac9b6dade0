use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stockledger_core::{CustomerId, OrderId, ProductId};
use stockledger_events::Event;

use crate::order::Order;
use crate::status::OrderStatus;

/// One line of a placed order as recorded in [`OrderPlaced`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedLine {
    pub product_id: ProductId,
    pub quantity: i64,
    pub price_at_order: u64,
}

/// Event: OrderPlaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    pub lines: Vec<PlacedLine>,
    pub total_amount: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderStatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusChanged {
    pub order_id: OrderId,
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub restocked: bool,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderDeleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDeleted {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub restocked: bool,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalesEvent {
    OrderPlaced(OrderPlaced),
    OrderStatusChanged(OrderStatusChanged),
    OrderDeleted(OrderDeleted),
}

impl SalesEvent {
    pub fn placed(order: &Order) -> Self {
        Self::OrderPlaced(OrderPlaced {
            order_id: order.id_typed(),
            customer_id: order.customer_id(),
            lines: order
                .items()
                .iter()
                .map(|item| PlacedLine {
                    product_id: item.product_id(),
                    quantity: item.quantity(),
                    price_at_order: item.price_at_order(),
                })
                .collect(),
            total_amount: order.total_amount(),
            occurred_at: order.order_date(),
        })
    }

    pub fn order_id(&self) -> OrderId {
        match self {
            SalesEvent::OrderPlaced(e) => e.order_id,
            SalesEvent::OrderStatusChanged(e) => e.order_id,
            SalesEvent::OrderDeleted(e) => e.order_id,
        }
    }
}

impl Event for SalesEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SalesEvent::OrderPlaced(_) => "sales.order.placed",
            SalesEvent::OrderStatusChanged(_) => "sales.order.status_changed",
            SalesEvent::OrderDeleted(_) => "sales.order.deleted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SalesEvent::OrderPlaced(e) => e.occurred_at,
            SalesEvent::OrderStatusChanged(e) => e.occurred_at,
            SalesEvent::OrderDeleted(e) => e.occurred_at,
        }
    }

    fn aggregate_type(&self) -> &'static str {
        "sales.order"
    }

    fn aggregate_id(&self) -> Uuid {
        *self.order_id().as_uuid()
    }
}
