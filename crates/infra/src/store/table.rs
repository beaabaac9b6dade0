use std::collections::BTreeMap;
use std::sync::Arc;

use stockledger_core::Entity;

/// Records of one entity type keyed by id.
///
/// Ids are time-ordered, so iteration order is creation order.
///
/// Copy-on-write: clones share their rows until one of them is written, so a
/// transaction only pays for copying the tables it actually modifies.
#[derive(Debug, Clone)]
pub struct Table<E: Entity> {
    rows: Arc<BTreeMap<E::Id, E>>,
}

impl<E: Entity> Default for Table<E> {
    fn default() -> Self {
        Self {
            rows: Arc::new(BTreeMap::new()),
        }
    }
}

impl<E: Entity> Table<E> {
    pub fn find_by_id(&self, id: &E::Id) -> Option<&E> {
        self.rows.get(id)
    }

    /// First record matching `predicate` (foreign-key and unique-column lookups).
    pub fn find_by(&self, predicate: impl Fn(&E) -> bool) -> Option<&E> {
        self.rows.values().find(|&row| predicate(row))
    }

    pub fn find_all(&self) -> impl Iterator<Item = &E> {
        self.rows.values()
    }

    pub fn exists_by_id(&self, id: &E::Id) -> bool {
        self.rows.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<E: Entity + Clone> Table<E> {
    /// Insert or replace, keyed by the record's own id. Returns the replaced record.
    pub fn save(&mut self, row: E) -> Option<E> {
        Arc::make_mut(&mut self.rows).insert(*row.id(), row)
    }

    pub fn delete_by_id(&mut self, id: &E::Id) -> Option<E> {
        if !self.rows.contains_key(id) {
            return None;
        }
        Arc::make_mut(&mut self.rows).remove(id)
    }

    /// Owned copy of every record, in id order.
    pub fn to_vec(&self) -> Vec<E> {
        self.rows.values().cloned().collect()
    }
}
