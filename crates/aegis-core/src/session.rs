//! Local record of the authenticated user.

/// The signed-in user as known client-side.
///
/// `customer_id` is the identifier assigned by the external payment
/// processor. It is required to open a billing portal session; users who
/// never subscribed have none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user_id: String,
    pub customer_id: Option<String>,
}

impl AuthSession {
    pub fn new(user_id: impl Into<String>, customer_id: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            customer_id,
        }
    }
}
