//! Custom actions on orders.

use crate::model::CustomerId;

#[derive(Debug, Clone, PartialEq)]
pub enum OrderAction {
    /// Cancel on behalf of `customer_id`. Succeeds only for the owner, inside the
    /// cancellation window, while the order is not yet terminal.
    Cancel { customer_id: CustomerId },
}
