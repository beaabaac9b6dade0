//! Supplier and customer reference data.
//!
//! Plain CRUD over the store; the only rules enforced here are uniqueness of
//! supplier names and customer emails.

use std::sync::Arc;

use stockledger_core::{CustomerId, DomainError, SupplierId};
use stockledger_parties::{Customer, CustomerDetails, Supplier, SupplierDetails};

use crate::error::LedgerResult;
use crate::store::{Store, Transaction};

#[derive(Debug)]
pub struct Directory<S> {
    store: Arc<S>,
}

impl<S> Directory<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: Store> Directory<S> {
    pub fn add_supplier(&self, details: SupplierDetails) -> LedgerResult<Supplier> {
        let supplier = Supplier::register(SupplierId::new(), details)?;
        let mut tx = self.store.begin()?;

        if tx.supplier_by_name(supplier.name()).is_some() {
            return Err(duplicate_supplier(supplier.name()).into());
        }
        tx.suppliers.save(supplier.clone());

        tx.commit()?;
        tracing::info!(supplier_id = %supplier.id_typed(), name = supplier.name(), "supplier added");
        Ok(supplier)
    }

    pub fn update_supplier(
        &self,
        supplier_id: SupplierId,
        details: SupplierDetails,
    ) -> LedgerResult<Supplier> {
        let mut tx = self.store.begin()?;
        let mut supplier = tx
            .suppliers
            .find_by_id(&supplier_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("supplier", supplier_id))?;

        supplier.update(details)?;
        let taken = tx
            .supplier_by_name(supplier.name())
            .is_some_and(|other| other.id_typed() != supplier_id);
        if taken {
            return Err(duplicate_supplier(supplier.name()).into());
        }
        tx.suppliers.save(supplier.clone());

        tx.commit()?;
        tracing::info!(%supplier_id, "supplier updated");
        Ok(supplier)
    }

    pub fn delete_supplier(&self, supplier_id: SupplierId) -> LedgerResult<()> {
        let mut tx = self.store.begin()?;
        tx.suppliers
            .delete_by_id(&supplier_id)
            .ok_or_else(|| DomainError::not_found("supplier", supplier_id))?;
        tx.commit()?;
        tracing::info!(%supplier_id, "supplier deleted");
        Ok(())
    }

    pub fn get_supplier(&self, supplier_id: SupplierId) -> LedgerResult<Supplier> {
        self.store
            .read(|t| t.suppliers.find_by_id(&supplier_id).cloned())?
            .ok_or_else(|| DomainError::not_found("supplier", supplier_id).into())
    }

    pub fn list_suppliers(&self) -> LedgerResult<Vec<Supplier>> {
        Ok(self.store.read(|t| t.suppliers.to_vec())?)
    }

    pub fn add_customer(&self, details: CustomerDetails) -> LedgerResult<Customer> {
        let customer = Customer::register(CustomerId::new(), details)?;
        let mut tx = self.store.begin()?;

        if tx.customer_by_email(customer.email()).is_some() {
            return Err(duplicate_email(customer.email()).into());
        }
        tx.customers.save(customer.clone());

        tx.commit()?;
        tracing::info!(customer_id = %customer.id_typed(), "customer added");
        Ok(customer)
    }

    pub fn update_customer(
        &self,
        customer_id: CustomerId,
        details: CustomerDetails,
    ) -> LedgerResult<Customer> {
        let mut tx = self.store.begin()?;
        let mut customer = tx
            .customers
            .find_by_id(&customer_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("customer", customer_id))?;

        customer.update(details)?;
        let taken = tx
            .customer_by_email(customer.email())
            .is_some_and(|other| other.id_typed() != customer_id);
        if taken {
            return Err(duplicate_email(customer.email()).into());
        }
        tx.customers.save(customer.clone());

        tx.commit()?;
        tracing::info!(%customer_id, "customer updated");
        Ok(customer)
    }

    /// Existing orders keep their `customer_id`; they are not touched.
    pub fn delete_customer(&self, customer_id: CustomerId) -> LedgerResult<()> {
        let mut tx = self.store.begin()?;
        tx.customers
            .delete_by_id(&customer_id)
            .ok_or_else(|| DomainError::not_found("customer", customer_id))?;
        tx.commit()?;
        tracing::info!(%customer_id, "customer deleted");
        Ok(())
    }

    pub fn get_customer(&self, customer_id: CustomerId) -> LedgerResult<Customer> {
        self.store
            .read(|t| t.customers.find_by_id(&customer_id).cloned())?
            .ok_or_else(|| DomainError::not_found("customer", customer_id).into())
    }

    pub fn list_customers(&self) -> LedgerResult<Vec<Customer>> {
        Ok(self.store.read(|t| t.customers.to_vec())?)
    }
}

fn duplicate_supplier(name: &str) -> DomainError {
    DomainError::conflict(format!("supplier '{name}' already exists"))
}

fn duplicate_email(email: &str) -> DomainError {
    DomainError::conflict(format!("a customer with email '{email}' already exists"))
}
