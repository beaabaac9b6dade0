use serde::{Deserialize, Serialize};

use stockledger_core::{DomainError, DomainResult, Entity, ProductId};

/// Editable product attributes.
///
/// Used both to create a product and to replace its details later. Quantity is
/// not part of this: stock moves only through the inventory ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
}

impl ProductDetails {
    pub fn new(name: impl Into<String>, price: u64) -> Self {
        Self {
            name: name.into(),
            description: None,
            price,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate and normalize (trimmed name, blank description dropped).
    pub fn validated(self) -> DomainResult<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if self.price == 0 {
            return Err(DomainError::validation("product price must be positive"));
        }
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Self {
            name,
            description,
            price: self.price,
        })
    }
}

/// A sellable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    description: Option<String>,
    price: u64,
    stock_level: i64,
}

impl Product {
    /// Create a product with no stock yet (`stock_level == 0`).
    pub fn create(id: ProductId, details: ProductDetails) -> DomainResult<Self> {
        let details = details.validated()?;
        Ok(Self {
            id,
            name: details.name,
            description: details.description,
            price: details.price,
            stock_level: 0,
        })
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn stock_level(&self) -> i64 {
        self.stock_level
    }

    /// Replace name, description and price. Stock level is untouched.
    pub fn update_details(&mut self, details: ProductDetails) -> DomainResult<()> {
        let details = details.validated()?;
        self.name = details.name;
        self.description = details.description;
        self.price = details.price;
        Ok(())
    }

    /// Mirror the authoritative stock quantity onto the product.
    ///
    /// Callers outside the inventory ledger should not use this; the ledger
    /// writes it in the same transaction as the stock record.
    pub fn set_stock_level(&mut self, level: i64) {
        self.stock_level = level;
    }
}

impl Entity for Product {
    type Id = ProductId;
    const KIND: &'static str = "product";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_normalizes_details_and_starts_without_stock() {
        let product = Product::create(
            ProductId::new(),
            ProductDetails::new("  Widget  ", 1_000).with_description("   "),
        )
        .unwrap();

        assert_eq!(product.name(), "Widget");
        assert_eq!(product.description(), None);
        assert_eq!(product.price(), 1_000);
        assert_eq!(product.stock_level(), 0);
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = Product::create(ProductId::new(), ProductDetails::new(" ", 10)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("name")));
    }

    #[test]
    fn zero_price_is_rejected() {
        let err = Product::create(ProductId::new(), ProductDetails::new("Widget", 0)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("price")));
    }

    #[test]
    fn update_details_keeps_stock_level() {
        let mut product =
            Product::create(ProductId::new(), ProductDetails::new("Widget", 1_000)).unwrap();
        product.set_stock_level(12);

        product
            .update_details(ProductDetails::new("Widget Pro", 2_000).with_description("bigger"))
            .unwrap();

        assert_eq!(product.name(), "Widget Pro");
        assert_eq!(product.description(), Some("bigger"));
        assert_eq!(product.price(), 2_000);
        assert_eq!(product.stock_level(), 12);
    }

    #[test]
    fn failed_update_leaves_product_unchanged() {
        let mut product =
            Product::create(ProductId::new(), ProductDetails::new("Widget", 1_000)).unwrap();
        let before = product.clone();

        assert!(product.update_details(ProductDetails::new("Widget", 0)).is_err());
        assert_eq!(product, before);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any non-blank name with a positive price is accepted and trimmed.
            #[test]
            fn valid_details_always_create(
                name in "[A-Za-z][A-Za-z0-9 ]{0,40}",
                price in 1u64..1_000_000,
            ) {
                let product = Product::create(ProductId::new(), ProductDetails::new(name.clone(), price)).unwrap();
                prop_assert_eq!(product.name(), name.trim());
                prop_assert_eq!(product.price(), price);
            }
        }
    }
}
