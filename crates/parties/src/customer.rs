use serde::{Deserialize, Serialize};

use stockledger_core::{CustomerId, DomainError, DomainResult, Entity};

/// Editable customer fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl CustomerDetails {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: None,
            address: None,
        }
    }

    /// Validate and normalize: names trimmed, email trimmed and lower-cased.
    pub fn validated(self) -> DomainResult<Self> {
        let first_name = self.first_name.trim().to_string();
        let last_name = self.last_name.trim().to_string();
        let email = self.email.trim().to_lowercase();

        if first_name.is_empty() || last_name.is_empty() {
            return Err(DomainError::validation("customer first and last name are required"));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation(format!("invalid customer email '{email}'")));
        }

        Ok(Self {
            first_name,
            last_name,
            email,
            phone: non_blank(self.phone),
            address: non_blank(self.address),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// A customer who can place orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    #[serde(flatten)]
    details: CustomerDetails,
}

impl Customer {
    pub fn register(id: CustomerId, details: CustomerDetails) -> DomainResult<Self> {
        Ok(Self {
            id,
            details: details.validated()?,
        })
    }

    pub fn id_typed(&self) -> CustomerId {
        self.id
    }

    pub fn details(&self) -> &CustomerDetails {
        &self.details
    }

    /// Normalized email; unique across customers.
    pub fn email(&self) -> &str {
        &self.details.email
    }

    pub fn update(&mut self, details: CustomerDetails) -> DomainResult<()> {
        self.details = details.validated()?;
        Ok(())
    }
}

impl Entity for Customer {
    type Id = CustomerId;
    const KIND: &'static str = "customer";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
