use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub u32);

impl From<u32> for CustomerId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "customer_{}", self.0)
    }
}

/// A shopper's profile: who owns orders and where their notifications go.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](crate::framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](crate::framework::ResourceActor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Payload for creating a new customer.
#[derive(Debug, Clone)]
pub struct CustomerCreate {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Payload for updating an existing customer. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Where a notification about an order should be delivered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Customer {
    pub fn new(
        id: CustomerId,
        name: impl Into<String>,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.map(str::to_string),
            phone: phone.map(str::to_string),
        }
    }

    /// The notification contact for this customer.
    ///
    /// Falls back to the phone number for the display name, the way the sign-up flow
    /// leaves phone-only accounts without a name.
    pub fn contact(&self) -> Contact {
        let name = if self.name.trim().is_empty() {
            self.phone.clone().unwrap_or_default()
        } else {
            self.name.clone()
        };
        Contact {
            name,
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}
