//! [`ActorEntity`] implementation for [`Customer`].

use crate::customer_actor::CustomerError;
use crate::framework::ActorEntity;
use crate::model::{Customer, CustomerCreate, CustomerId, CustomerUpdate};
use async_trait::async_trait;

#[async_trait]
impl ActorEntity for Customer {
    type Id = CustomerId;
    type Create = CustomerCreate;
    type Update = CustomerUpdate;
    type Action = ();
    type ActionResult = ();
    type Query = ();
    type Context = ();
    type Error = CustomerError;

    /// A customer needs some way to be reached: an email address or a phone number.
    fn from_create_params(
        id: CustomerId,
        params: CustomerCreate,
        _ctx: &(),
    ) -> Result<Self, CustomerError> {
        let customer = Self {
            id,
            name: params.name.trim().to_string(),
            email: non_blank(params.email),
            phone: non_blank(params.phone),
        };
        validate(&customer)?;
        Ok(customer)
    }

    fn matches(&self, _query: &()) -> bool {
        true
    }

    async fn on_update(&mut self, update: CustomerUpdate, _ctx: &()) -> Result<(), CustomerError> {
        let mut updated = self.clone();
        if let Some(name) = update.name {
            updated.name = name.trim().to_string();
        }
        if update.email.is_some() {
            updated.email = non_blank(update.email);
        }
        if update.phone.is_some() {
            updated.phone = non_blank(update.phone);
        }
        validate(&updated)?;
        *self = updated;
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), CustomerError> {
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate(customer: &Customer) -> Result<(), CustomerError> {
    if customer.email.is_none() && customer.phone.is_none() {
        return Err(CustomerError::Validation(
            "an email address or phone number is required".to_string(),
        ));
    }
    if let Some(email) = &customer.email {
        if !email.contains('@') {
            return Err(CustomerError::Validation(format!("invalid email: {email}")));
        }
    }
    Ok(())
}
