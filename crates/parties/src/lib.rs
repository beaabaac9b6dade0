//! Reference data: customers and suppliers.
//!
//! Plain records with field validation only; uniqueness (supplier name,
//! customer email) is checked by the directory service against the store.

pub mod customer;
pub mod supplier;

pub use customer::{Customer, CustomerDetails};
pub use supplier::{Supplier, SupplierDetails};
