//! Order and payment status vocabulary.

use serde::{Deserialize, Serialize};

/// The state of an order in its lifecycle.
///
/// Forward transitions:
/// ```text
/// Pending ──► Processing ──► Shipped ──► OutForDelivery ──► Delivered
///     │            │            │              │
///     └────────────┴────────────┴──────────────┴──► Cancelled / Returned
/// ```
///
/// `Delivered`, `Cancelled`, and `Returned` are terminal: once reached, the
/// client offers no further transition. The backend is the final authority
/// on any transition the client does permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order placed, not yet picked up for processing.
    #[default]
    Pending,

    /// Order is being prepared.
    Processing,

    /// Order handed to the carrier.
    Shipped,

    /// Order is on the delivery vehicle.
    OutForDelivery,

    /// Order reached the customer (terminal).
    Delivered,

    /// Order was cancelled before delivery (terminal).
    Cancelled,

    /// Order was returned after delivery (terminal).
    Returned,
}

impl OrderStatus {
    /// All statuses, in lifecycle order. Used to populate admin dropdowns
    /// when the remote enumeration endpoint is unavailable.
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
        OrderStatus::Returned,
    ];

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered | OrderStatus::Cancelled | OrderStatus::Returned
        )
    }

    /// Returns true if the client may offer a status edit from this state.
    pub fn can_edit(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::OutForDelivery => "OUT_FOR_DELIVERY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Returned => "RETURNED",
        }
    }

    /// Returns a human-readable label for display.
    pub fn display_label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Returned => "Returned",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The payment state of an order.
///
/// `Pending → Paid`, with `Failed` and `Refunded` as absorbing alternatives.
/// `RefundInitiated` is set by the backend when a return is accepted and can
/// still be advanced (to `Refunded`) by an admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Payment not yet collected (cash on delivery, or pay-now not settled).
    #[default]
    Pending,

    /// Payment settled (terminal for the client).
    Paid,

    /// Payment attempt failed.
    Failed,

    /// A refund has been started but not completed.
    RefundInitiated,

    /// Payment refunded in full (terminal for the client).
    Refunded,
}

impl PaymentStatus {
    /// All payment statuses. Fallback for admin dropdowns.
    pub const ALL: [PaymentStatus; 5] = [
        PaymentStatus::Pending,
        PaymentStatus::Paid,
        PaymentStatus::Failed,
        PaymentStatus::RefundInitiated,
        PaymentStatus::Refunded,
    ];

    /// Returns true if the client permits no further payment edits.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PaymentStatus::Paid | PaymentStatus::Refunded)
    }

    /// Returns true if the client may offer a payment-status edit.
    pub fn can_edit(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if this payment state allows marking an order delivered.
    pub fn settles_delivery(&self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }

    /// Returns the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::RefundInitiated => "REFUND_INITIATED",
            PaymentStatus::Refunded => "REFUNDED",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the customer chose to pay at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentOption {
    /// Pay the courier on delivery.
    CashOnDelivery,

    /// Pay immediately with a stored payment method.
    PayNow,
}

impl PaymentOption {
    /// The payment status a freshly placed order starts in for this option.
    ///
    /// Paying now settles immediately; cash on delivery stays pending until
    /// the courier collects.
    pub fn initial_payment_status(&self) -> PaymentStatus {
        match self {
            PaymentOption::CashOnDelivery => PaymentStatus::Pending,
            PaymentOption::PayNow => PaymentStatus::Paid,
        }
    }

    /// Returns the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentOption::CashOnDelivery => "CASH_ON_DELIVERY",
            PaymentOption::PayNow => "PAY_NOW",
        }
    }
}

impl std::fmt::Display for PaymentOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_order_statuses() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Returned.is_terminal());

        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Processing.is_terminal());
        assert!(!OrderStatus::Shipped.is_terminal());
        assert!(!OrderStatus::OutForDelivery.is_terminal());
    }

    #[test]
    fn test_can_edit_mirrors_terminality() {
        for status in OrderStatus::ALL {
            assert_eq!(status.can_edit(), !status.is_terminal());
        }
    }

    #[test]
    fn test_terminal_payment_statuses() {
        assert!(PaymentStatus::Paid.is_terminal());
        assert!(PaymentStatus::Refunded.is_terminal());

        assert!(!PaymentStatus::Pending.is_terminal());
        assert!(!PaymentStatus::Failed.is_terminal());
        assert!(!PaymentStatus::RefundInitiated.is_terminal());
    }

    #[test]
    fn test_only_paid_settles_delivery() {
        for status in PaymentStatus::ALL {
            assert_eq!(status.settles_delivery(), status == PaymentStatus::Paid);
        }
    }

    #[test]
    fn test_initial_payment_status_per_option() {
        assert_eq!(
            PaymentOption::CashOnDelivery.initial_payment_status(),
            PaymentStatus::Pending
        );
        assert_eq!(
            PaymentOption::PayNow.initial_payment_status(),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn test_wire_representation() {
        let json = serde_json::to_string(&OrderStatus::OutForDelivery).unwrap();
        assert_eq!(json, "\"OUT_FOR_DELIVERY\"");

        let back: OrderStatus = serde_json::from_str("\"RETURNED\"").unwrap();
        assert_eq!(back, OrderStatus::Returned);

        let payment: PaymentStatus = serde_json::from_str("\"REFUND_INITIATED\"").unwrap();
        assert_eq!(payment, PaymentStatus::RefundInitiated);

        assert_eq!(
            serde_json::to_string(&PaymentOption::CashOnDelivery).unwrap(),
            "\"CASH_ON_DELIVERY\""
        );
    }

    #[test]
    fn test_display_label() {
        assert_eq!(OrderStatus::OutForDelivery.display_label(), "Out for Delivery");
        assert_eq!(OrderStatus::OutForDelivery.to_string(), "OUT_FOR_DELIVERY");
    }
}
