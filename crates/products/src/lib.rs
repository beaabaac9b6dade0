//! Product catalog domain module.
//!
//! Products carry the commercial attributes (name, description, price) plus a
//! denormalized `stock_level` that mirrors the product's stock record. Only the
//! inventory ledger writes that mirror.

pub mod product;

pub use product::{Product, ProductDetails};
