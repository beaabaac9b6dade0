//! `stockledger-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the error taxonomy shared by every inventory operation, and the
//! `Entity` trait used by the store to key records.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CustomerId, OrderId, OrderItemId, ProductId, ReportId, StockId, SupplierId};
