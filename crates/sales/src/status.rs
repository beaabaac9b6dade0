use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockledger_core::{DomainError, DomainResult};

/// Order status lifecycle.
///
/// ```text
/// PENDING ──► SHIPPED ──► DELIVERED
///    │           │
///    └──► CANCELLED ◄┘
/// ```
///
/// DELIVERED and CANCELLED are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether `self -> next` is an allowed edge. Staying in place is not.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Shipped)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Shipped, OrderStatus::Delivered)
                | (OrderStatus::Shipped, OrderStatus::Cancelled)
        )
    }

    /// Validate `self -> next`, returning `next` on success.
    pub fn transition(self, next: OrderStatus) -> DomainResult<OrderStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::invalid_transition(self, next))
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "unknown order status '{s}' (expected one of PENDING, SHIPPED, DELIVERED, CANCELLED)"
                ))
            })
    }
}
