//! Domain error types.

use common::{CartItemId, OrderId, OrderStatus, PaymentStatus};
use rest::RestError;
use thiserror::Error;

/// Errors caught client-side before any network call is made.
///
/// Each variant's message is what the user sees; validation failures
/// short-circuit the operation and never reach the remote collaborator.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// No cart lines are selected for checkout.
    #[error("Please select at least one item to place an order.")]
    NoItemsSelected,

    /// No shipping address chosen.
    #[error("Please select a shipping address.")]
    AddressRequired,

    /// Paying now without choosing a payment method.
    #[error("Please select a payment method.")]
    PaymentMethodRequired,

    /// Paying now without account details.
    #[error("Please provide account details for the selected payment method.")]
    PaymentAccountRequired,

    /// Marking an order delivered before its payment settled.
    #[error("Cannot mark as DELIVERED unless payment is PAID.")]
    DeliveryRequiresPayment,

    /// Editing the status of an order in a terminal state.
    #[error("Order status can no longer change once {status}.")]
    OrderStatusLocked { status: OrderStatus },

    /// Editing a settled payment status.
    #[error("Payment status can no longer change once {status}.")]
    PaymentStatusLocked { status: PaymentStatus },

    /// Returning an order that was never delivered.
    #[error("Only delivered orders can be returned.")]
    ReturnRequiresDelivery,

    /// A cart operation referenced a line that is not in the mirror.
    #[error("Cart item {cart_item_id} is not in the cart.")]
    LineNotFound { cart_item_id: CartItemId },

    /// An order operation referenced an order that is not loaded.
    #[error("Order {order_id} is not in the current list.")]
    OrderNotFound { order_id: OrderId },
}

/// Errors surfaced by domain operations: either a local validation failure
/// or a remote/network failure from the collaborator boundary.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Remote(#[from] RestError),
}

impl DomainError {
    /// Returns the message to show the user.
    pub fn user_message(&self) -> String {
        match self {
            DomainError::Validation(err) => err.to_string(),
            DomainError::Remote(err) => err.user_message().to_string(),
        }
    }

    /// Returns true if this failure never left the client.
    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_passes_through() {
        let err = DomainError::from(ValidationError::AddressRequired);
        assert_eq!(err.user_message(), "Please select a shipping address.");
        assert!(err.is_validation());
    }

    #[test]
    fn test_remote_message_uses_status_mapping() {
        let err = DomainError::from(RestError::from_status(503, "down"));
        assert_eq!(
            err.user_message(),
            "The service is temporarily unavailable. Please try again later."
        );
        assert!(!err.is_validation());
    }

    #[test]
    fn test_locked_status_message_names_state() {
        let err = ValidationError::OrderStatusLocked {
            status: OrderStatus::Delivered,
        };
        assert_eq!(
            err.to_string(),
            "Order status can no longer change once DELIVERED."
        );
    }
}
