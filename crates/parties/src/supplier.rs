use serde::{Deserialize, Serialize};

use stockledger_core::{DomainError, DomainResult, Entity, SupplierId};

/// Editable supplier fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierDetails {
    pub name: String,
    #[serde(default)]
    pub contact_info: Option<String>,
    /// Free-text description of what the supplier delivers.
    #[serde(default)]
    pub products_supplied: Option<String>,
}

impl SupplierDetails {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact_info: None,
            products_supplied: None,
        }
    }

    pub fn validated(self) -> DomainResult<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("supplier name cannot be empty"));
        }
        Ok(Self {
            name,
            contact_info: self.contact_info,
            products_supplied: self.products_supplied,
        })
    }
}

/// A supplier of goods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    id: SupplierId,
    #[serde(flatten)]
    details: SupplierDetails,
}

impl Supplier {
    pub fn register(id: SupplierId, details: SupplierDetails) -> DomainResult<Self> {
        Ok(Self {
            id,
            details: details.validated()?,
        })
    }

    pub fn id_typed(&self) -> SupplierId {
        self.id
    }

    /// Unique across suppliers.
    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn details(&self) -> &SupplierDetails {
        &self.details
    }

    pub fn update(&mut self, details: SupplierDetails) -> DomainResult<()> {
        self.details = details.validated()?;
        Ok(())
    }
}

impl Entity for Supplier {
    type Id = SupplierId;
    const KIND: &'static str = "supplier";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
