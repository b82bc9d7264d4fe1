//! Validated wire records for the storefront backend.
//!
//! Incoming JSON is parsed into these explicit shapes and checked against
//! the record invariants before anything downstream sees it. A payload that
//! violates an invariant is a decode-time [`RestError`], never a panic.

use chrono::{DateTime, Utc};
use common::{AddressId, CartItemId, Money, OrderId, OrderStatus, PaymentOption, PaymentStatus,
    ProductId, UserId};
use serde::{Deserialize, Serialize};

use crate::error::RestError;

/// A catalog product as the backend reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_category: String,
    #[serde(default)]
    pub product_description: String,
    pub product_price: Money,
    /// Units in stock.
    pub product_quantity: i64,
}

impl Product {
    /// Checks the record invariants: price and stock are non-negative.
    pub fn validate(&self) -> Result<(), RestError> {
        if self.product_price.is_negative() {
            return Err(RestError::InvalidRecord {
                entity: "product",
                reason: format!(
                    "product {} has negative price {}",
                    self.product_id, self.product_price
                ),
            });
        }
        if self.product_quantity < 0 {
            return Err(RestError::InvalidRecord {
                entity: "product",
                reason: format!(
                    "product {} has negative stock {}",
                    self.product_id, self.product_quantity
                ),
            });
        }
        Ok(())
    }
}

/// One entry of a user's server-side cart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    pub cart_item_id: CartItemId,
    pub product: Product,
    pub product_quantity: u32,
}

impl CartEntry {
    /// Checks the entry invariants: a positive quantity and a valid product.
    pub fn validate(&self) -> Result<(), RestError> {
        if self.product_quantity == 0 {
            return Err(RestError::InvalidRecord {
                entity: "cart entry",
                reason: format!("cart item {} has zero quantity", self.cart_item_id),
            });
        }
        self.product.validate()
    }
}

/// One product line inside a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRecord {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
}

/// A placed order as reported by the order collaborator.
///
/// Orders are created once by the backend and only ever transition status;
/// the client never mutates any other field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub address_id: AddressId,
    pub products: Vec<OrderLineRecord>,
    pub order_status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_option: PaymentOption,
    pub order_date: DateTime<Utc>,
}

impl OrderRecord {
    /// Total amount across all lines, recomputed from quantities and unit
    /// prices rather than trusted from the backend.
    pub fn total_amount(&self) -> Money {
        self.products
            .iter()
            .map(|line| line.unit_price.multiply(line.quantity))
            .sum()
    }

    /// Comma-separated product names for compact display.
    pub fn product_names(&self) -> String {
        self.products
            .iter()
            .map(|line| line.product_name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A saved shipping address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address_id: AddressId,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

/// A new shipping address to save.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    pub user_id: UserId,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

/// A stored payment method.
///
/// The backend reports these as single-entry `{ kind: value }` maps; the
/// HTTP implementation flattens them into this shape.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentMethod {
    /// Method kind, e.g. `"UPI"` or `"CARD"`.
    pub kind: String,
    /// Account handle or masked number.
    pub value: String,
}

/// A new payment method to store.
#[derive(Debug, Clone, Serialize)]
pub struct NewPaymentMethod {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// Account details of the logged-in user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: UserId,
    pub user_name: String,
    pub user_email: String,
}

/// Login credentials.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_email: String,
    pub user_password: String,
}

/// Successful login payload: the bearer token and the numeric user id the
/// session context is built from.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_token: String,
    pub user_id: UserId,
}

/// Registration payload for a new customer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub user_name: String,
    pub user_email: String,
    pub user_password: String,
}

/// A product to add to the catalog (the backend assigns the id).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub product_name: String,
    pub product_category: String,
    pub product_description: String,
    pub product_price: Money,
    pub product_quantity: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> Product {
        Product {
            product_id: ProductId::new(1),
            product_name: "Widget".into(),
            product_category: "Tools".into(),
            product_description: String::new(),
            product_price: Money::from_cents(1000),
            product_quantity: 5,
        }
    }

    #[test]
    fn test_product_decodes_from_backend_shape() {
        let json = r#"{
            "productId": 10,
            "productName": "Widget",
            "productCategory": "Tools",
            "productPrice": 1000,
            "productQuantity": 5
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.product_id, ProductId::new(10));
        assert_eq!(product.product_price.cents(), 1000);
        assert!(product.validate().is_ok());
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut product = widget();
        product.product_price = Money::from_cents(-1);
        assert!(matches!(
            product.validate(),
            Err(RestError::InvalidRecord { entity: "product", .. })
        ));
    }

    #[test]
    fn test_negative_stock_rejected() {
        let mut product = widget();
        product.product_quantity = -3;
        assert!(product.validate().is_err());
    }

    #[test]
    fn test_cart_entry_zero_quantity_rejected() {
        let entry = CartEntry {
            cart_item_id: CartItemId::new(1),
            product: widget(),
            product_quantity: 0,
        };
        assert!(entry.validate().is_err());
    }

    #[test]
    fn test_order_total_recomputed_from_lines() {
        let order = OrderRecord {
            order_id: OrderId::new(1),
            user_id: UserId::new(1),
            address_id: AddressId::new(1),
            products: vec![
                OrderLineRecord {
                    product_id: ProductId::new(1),
                    product_name: "Widget".into(),
                    quantity: 2,
                    unit_price: Money::from_cents(100),
                },
                OrderLineRecord {
                    product_id: ProductId::new(2),
                    product_name: "Gadget".into(),
                    quantity: 1,
                    unit_price: Money::from_cents(50),
                },
            ],
            order_status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_option: PaymentOption::CashOnDelivery,
            order_date: Utc::now(),
        };

        assert_eq!(order.total_amount().cents(), 250);
        assert_eq!(order.product_names(), "Widget, Gadget");
    }
}
