//! Client-side domain logic for the storefront.
//!
//! This crate holds the behaviour the UI layers drive:
//! - the [`cart`] aggregate: a locally-visible, eventually-consistent
//!   mirror of the server-side cart with optimistic mutation and rollback
//! - the [`checkout`] flow: composing a cart selection, address, and
//!   payment choice into an order submission
//! - the [`orders`] book: status-edit guards, cancel/return, and
//!   delivery-date arithmetic

pub mod cart;
pub mod checkout;
pub mod error;
pub mod orders;

pub use cart::{Cart, CartLine, CartService, CartTotals, ShippingTier};
pub use checkout::{CheckoutSelection, PaymentChoice, PlacementReceipt, place_order};
pub use error::{DomainError, ValidationError};
pub use orders::{
    OrderBook, can_edit_order_status, can_edit_payment_status, can_transition_to_delivered,
};
pub use orders::delivery::{
    DeliveryCountdown, delivery_countdown, displayed_delivery_date, estimated_delivery,
    format_delivery_date,
};
