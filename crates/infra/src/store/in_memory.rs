use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard};

use super::{Store, StoreError, Tables, Transaction};

/// In-memory store.
///
/// A single writer lock serializes transactions. Each transaction works on a
/// staged copy of the tables and swaps it in on commit, so a failed or
/// abandoned transaction leaves committed data untouched.
///
/// Staging is cheap because [`Tables`] are copy-on-write per table: a write
/// copies only the tables it touches. An `adjust_quantity` copies the product
/// and stock tables, never the order history.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl Store for InMemoryStore {
    type Tx<'a>
        = InMemoryTransaction<'a>
    where
        Self: 'a;

    fn begin(&self) -> Result<InMemoryTransaction<'_>, StoreError> {
        let guard = self.lock()?;
        let staged = guard.clone();
        Ok(InMemoryTransaction {
            guard,
            staged,
            committed: false,
        })
    }

    fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> Result<R, StoreError> {
        let guard = self.lock()?;
        Ok(f(&guard))
    }
}

/// Write transaction over an [`InMemoryStore`].
///
/// Holds the store lock for its whole lifetime.
pub struct InMemoryTransaction<'a> {
    guard: MutexGuard<'a, Tables>,
    staged: Tables,
    committed: bool,
}

impl Deref for InMemoryTransaction<'_> {
    type Target = Tables;

    fn deref(&self) -> &Tables {
        &self.staged
    }
}

impl DerefMut for InMemoryTransaction<'_> {
    fn deref_mut(&mut self) -> &mut Tables {
        &mut self.staged
    }
}

impl Transaction for InMemoryTransaction<'_> {
    fn commit(mut self) -> Result<(), StoreError> {
        *self.guard = std::mem::take(&mut self.staged);
        self.committed = true;
        Ok(())
    }
}

impl Drop for InMemoryTransaction<'_> {
    fn drop(&mut self) {
        if !self.committed {
            tracing::debug!("transaction rolled back");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockledger_core::SupplierId;
    use stockledger_parties::{Supplier, SupplierDetails};

    fn acme() -> Supplier {
        Supplier::register(SupplierId::new(), SupplierDetails::new("Acme")).unwrap()
    }

    #[test]
    fn committed_writes_are_visible() {
        let store = InMemoryStore::new();
        let supplier = acme();

        let mut tx = store.begin().unwrap();
        tx.suppliers.save(supplier.clone());
        tx.commit().unwrap();

        let found = store
            .read(|t| t.suppliers.find_by_id(&supplier.id_typed()).cloned())
            .unwrap();
        assert_eq!(found, Some(supplier));
    }

    #[test]
    fn dropped_transaction_rolls_back() {
        let store = InMemoryStore::new();

        {
            let mut tx = store.begin().unwrap();
            tx.suppliers.save(acme());
            assert_eq!(tx.suppliers.len(), 1);
        }

        assert_eq!(store.read(|t| t.suppliers.len()).unwrap(), 0);
    }

    #[test]
    fn transaction_sees_its_own_writes_before_commit() {
        let store = InMemoryStore::new();
        let mut tx = store.begin().unwrap();
        tx.suppliers.save(acme());
        assert!(tx.supplier_by_name("Acme").is_some());
    }

    #[test]
    fn snapshots_are_unaffected_by_later_commits() {
        let store = InMemoryStore::new();
        let mut tx = store.begin().unwrap();
        tx.suppliers.save(acme());
        tx.commit().unwrap();

        let before = store.read(|t| t.clone()).unwrap();
        let mut tx = store.begin().unwrap();
        tx.suppliers.save(acme());
        tx.commit().unwrap();
        let after = store.read(|t| t.clone()).unwrap();

        assert_eq!(before.suppliers.len(), 1);
        assert_eq!(after.suppliers.len(), 2);
        assert!(after.customers.is_empty());
    }

    #[test]
    fn concurrent_transactions_are_serialized() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..25 {
                        let mut tx = store.begin().unwrap();
                        tx.suppliers.save(acme());
                        tx.commit().unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.read(|t| t.suppliers.len()).unwrap(), 200);
    }
}
