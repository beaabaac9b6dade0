//! Transactional record store.
//!
//! Writes go through a [`Transaction`]: a scoped object that exposes the
//! tables for reading and writing, becomes visible only on [`Transaction::commit`],
//! and is rolled back when dropped without committing. Reads outside a
//! transaction see committed data only.

pub mod in_memory;
pub mod table;

use std::ops::DerefMut;

use thiserror::Error;

use stockledger_core::ProductId;
use stockledger_inventory::Stock;
use stockledger_parties::{Customer, Supplier};
use stockledger_products::Product;
use stockledger_sales::Order;

use crate::reports::Report;

pub use in_memory::{InMemoryStore, InMemoryTransaction};
pub use table::Table;

/// Store operation error (infrastructure, not business rules).
#[derive(Debug, Error)]
pub enum StoreError {
    /// A writer panicked while holding the store lock.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Every table the inventory backend persists.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub products: Table<Product>,
    pub stock: Table<Stock>,
    pub orders: Table<Order>,
    pub customers: Table<Customer>,
    pub suppliers: Table<Supplier>,
    /// Generated reports, kept as produced.
    pub reports: Table<Report>,
}

impl Tables {
    /// Stock-by-product lookup (the 1:1 foreign key).
    pub fn stock_for_product(&self, product_id: ProductId) -> Option<&Stock> {
        self.stock.find_by(|s| s.product_id() == product_id)
    }

    pub fn product_by_name(&self, name: &str) -> Option<&Product> {
        self.products.find_by(|p| p.name() == name)
    }

    pub fn supplier_by_name(&self, name: &str) -> Option<&Supplier> {
        self.suppliers.find_by(|s| s.name() == name)
    }

    pub fn customer_by_email(&self, email: &str) -> Option<&Customer> {
        self.customers.find_by(|c| c.email() == email)
    }
}

/// A scoped unit of work over [`Tables`].
///
/// Dropping a transaction without calling `commit` discards every change made
/// through it.
pub trait Transaction: DerefMut<Target = Tables> {
    fn commit(self) -> Result<(), StoreError>;
}

/// Durable home of all records.
///
/// Implementations must serialize transactions that touch the same records so
/// that read-modify-write sequences on a stock row cannot lose updates. An open
/// transaction excludes other writers until it commits or is dropped.
pub trait Store: Send + Sync {
    type Tx<'a>: Transaction
    where
        Self: 'a;

    /// Open a write transaction.
    fn begin(&self) -> Result<Self::Tx<'_>, StoreError>;

    /// Run `f` against committed data.
    fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> Result<R, StoreError>;
}
