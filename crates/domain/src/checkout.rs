//! Order placement: cart selection + address + payment choice → submission.

use chrono::{NaiveDate, Utc};
use common::{AddressId, PaymentOption};
use rest::{CartApi, OrderApi, OrderRecord, PaymentMethod, PlaceOrderLine, SessionContext};

use crate::cart::{Cart, CartService};
use crate::error::{DomainError, ValidationError};
use crate::orders::delivery::estimated_delivery;

/// How the customer pays for this checkout.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentChoice {
    /// Pay the courier on delivery; needs no stored method.
    CashOnDelivery,

    /// Pay immediately with a stored method and its account details.
    PayNow {
        method: PaymentMethod,
        account: String,
    },
}

impl PaymentChoice {
    /// The wire payment option this choice maps to.
    pub fn option(&self) -> PaymentOption {
        match self {
            PaymentChoice::CashOnDelivery => PaymentOption::CashOnDelivery,
            PaymentChoice::PayNow { .. } => PaymentOption::PayNow,
        }
    }
}

/// What the user has picked on the checkout screen so far.
#[derive(Debug, Clone, Default)]
pub struct CheckoutSelection {
    pub address: Option<AddressId>,
    pub payment: Option<PaymentChoice>,
}

/// Outcome of a successful placement.
#[derive(Debug, Clone)]
pub struct PlacementReceipt {
    /// The orders the backend created, one per submitted line.
    pub orders: Vec<OrderRecord>,
    /// Estimated delivery: order date plus the delivery window.
    pub estimated_delivery: NaiveDate,
}

/// Checks the placement preconditions, in order, short-circuiting on the
/// first failure. Runs entirely client-side; no remote call is made for a
/// rejected checkout.
///
/// Explicit selection is required: an empty selection is an error, it does
/// not fall back to the whole cart.
fn validate(
    cart: &Cart,
    selection: &CheckoutSelection,
) -> Result<(AddressId, PaymentOption), ValidationError> {
    if cart.selected_lines().next().is_none() {
        return Err(ValidationError::NoItemsSelected);
    }

    let address = selection.address.ok_or(ValidationError::AddressRequired)?;

    let payment = selection
        .payment
        .as_ref()
        .ok_or(ValidationError::PaymentMethodRequired)?;
    if let PaymentChoice::PayNow { method, account } = payment {
        if method.kind.trim().is_empty() {
            return Err(ValidationError::PaymentMethodRequired);
        }
        if account.trim().is_empty() {
            return Err(ValidationError::PaymentAccountRequired);
        }
    }

    Ok((address, payment.option()))
}

/// Builds one order-line request per selected cart line.
///
/// `payment_status` starts `PAID` iff paying now, else `PENDING`. Lines
/// pending deletion are excluded from `selected_lines` already and so are
/// never placed.
fn build_order_lines(
    cart: &Cart,
    session: &SessionContext,
    address: AddressId,
    option: PaymentOption,
) -> Vec<PlaceOrderLine> {
    cart.selected_lines()
        .map(|line| PlaceOrderLine {
            user_id: session.user_id(),
            address_id: address,
            product_id: line.product.product_id,
            quantity: line.quantity,
            payment_option: option,
            payment_status: option.initial_payment_status(),
        })
        .collect()
}

/// Places an order from the current cart selection.
///
/// On success the selection is cleared, the cart reloaded from the remote
/// (which is expected to have cleared the ordered lines), and a receipt
/// with the delivery estimate returned. On failure the cart and selection
/// are left exactly as they were.
#[tracing::instrument(skip_all, fields(user = %cart.session().user_id()))]
pub async fn place_order<C: CartApi, O: OrderApi>(
    cart: &mut CartService<C>,
    orders: &O,
    selection: &CheckoutSelection,
) -> Result<PlacementReceipt, DomainError> {
    let (address, option) = match validate(cart.cart(), selection) {
        Ok(checked) => checked,
        Err(err) => {
            metrics::counter!("checkout_rejected_total").increment(1);
            return Err(err.into());
        }
    };

    let lines = build_order_lines(cart.cart(), cart.session(), address, option);
    let placed = orders.place_order(cart.session(), &lines).await?;
    metrics::counter!("orders_placed_total").increment(placed.len() as u64);

    cart.clear_selection();
    if let Err(err) = cart.load().await {
        // The order went through; a failed refresh only degrades the view.
        tracing::warn!(error = %err, "cart reload after placement failed");
    }

    let placed_on = placed.first().map(|o| o.order_date).unwrap_or_else(Utc::now);
    Ok(PlacementReceipt {
        estimated_delivery: estimated_delivery(placed_on),
        orders: placed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{CartItemId, Money, OrderStatus, PaymentStatus, ProductId, UserId};
    use rest::{InMemoryCartService, InMemoryOrderService, Product};

    fn widget(id: i64, price_cents: i64) -> Product {
        Product {
            product_id: ProductId::new(id),
            product_name: format!("Product {id}"),
            product_category: "General".into(),
            product_description: String::new(),
            product_price: Money::from_cents(price_cents),
            product_quantity: 100,
        }
    }

    fn cash() -> PaymentChoice {
        PaymentChoice::CashOnDelivery
    }

    fn pay_now(kind: &str, account: &str) -> PaymentChoice {
        PaymentChoice::PayNow {
            method: PaymentMethod {
                kind: kind.into(),
                value: "stored".into(),
            },
            account: account.into(),
        }
    }

    async fn checkout_fixture() -> (
        CartService<InMemoryCartService>,
        InMemoryOrderService,
        InMemoryCartService,
    ) {
        let catalog = vec![widget(10, 100), widget(20, 50)];
        let cart_remote = InMemoryCartService::with_catalog(catalog.clone());
        let order_remote = InMemoryOrderService::with_catalog(catalog);
        let session = SessionContext::new(UserId::new(1), "token");

        let mut cart = CartService::new(cart_remote.clone(), session);
        cart.add_line(ProductId::new(10), 2).await.unwrap();
        cart.add_line(ProductId::new(20), 1).await.unwrap();
        (cart, order_remote, cart_remote)
    }

    fn selection(address: Option<i64>, payment: Option<PaymentChoice>) -> CheckoutSelection {
        CheckoutSelection {
            address: address.map(AddressId::new),
            payment,
        }
    }

    #[tokio::test]
    async fn test_cash_on_delivery_places_selected_line() {
        let (mut cart, orders, _) = checkout_fixture().await;
        let first = cart.cart().lines()[0].cart_item_id;
        cart.toggle_selection(first, true);

        let receipt = place_order(&mut cart, &orders, &selection(Some(5), Some(cash())))
            .await
            .unwrap();

        assert_eq!(receipt.orders.len(), 1);
        let order = &receipt.orders[0];
        assert_eq!(order.products[0].product_id, ProductId::new(10));
        assert_eq!(order.products[0].quantity, 2);
        assert_eq!(order.payment_option, PaymentOption::CashOnDelivery);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.order_status, OrderStatus::Pending);

        // Selection cleared and cart reloaded from the remote.
        assert_eq!(cart.totals().selected_item_count, 0);
        assert_eq!(orders.call_count("place_order"), 1);
    }

    #[tokio::test]
    async fn test_pay_now_marks_lines_paid() {
        let (mut cart, orders, _) = checkout_fixture().await;
        for line in cart.cart().lines().to_vec() {
            cart.toggle_selection(line.cart_item_id, true);
        }

        let receipt = place_order(
            &mut cart,
            &orders,
            &selection(Some(5), Some(pay_now("UPI", "asha@upi"))),
        )
        .await
        .unwrap();

        assert_eq!(receipt.orders.len(), 2);
        for order in &receipt.orders {
            assert_eq!(order.payment_status, PaymentStatus::Paid);
            assert_eq!(order.payment_option, PaymentOption::PayNow);
        }
    }

    #[tokio::test]
    async fn test_no_selection_is_rejected_without_remote_call() {
        let (mut cart, orders, _) = checkout_fixture().await;

        let result = place_order(&mut cart, &orders, &selection(Some(5), Some(cash()))).await;

        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::NoItemsSelected))
        ));
        assert_eq!(orders.call_count("place_order"), 0);
    }

    #[tokio::test]
    async fn test_missing_address_is_rejected_without_remote_call() {
        let (mut cart, orders, _) = checkout_fixture().await;
        let first = cart.cart().lines()[0].cart_item_id;
        cart.toggle_selection(first, true);

        let result = place_order(&mut cart, &orders, &selection(None, Some(cash()))).await;

        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::AddressRequired))
        ));
        assert_eq!(orders.call_count("place_order"), 0);
        // Cart and selection untouched.
        assert!(cart.cart().is_selected(first));
    }

    #[tokio::test]
    async fn test_pay_now_requires_account_details() {
        let (mut cart, orders, _) = checkout_fixture().await;
        let first = cart.cart().lines()[0].cart_item_id;
        cart.toggle_selection(first, true);

        let result = place_order(
            &mut cart,
            &orders,
            &selection(Some(5), Some(pay_now("UPI", "  "))),
        )
        .await;

        assert!(matches!(
            result,
            Err(DomainError::Validation(
                ValidationError::PaymentAccountRequired
            ))
        ));
        assert_eq!(orders.call_count("place_order"), 0);
    }

    #[tokio::test]
    async fn test_missing_payment_choice_is_rejected() {
        let (mut cart, orders, _) = checkout_fixture().await;
        let first = cart.cart().lines()[0].cart_item_id;
        cart.toggle_selection(first, true);

        let result = place_order(&mut cart, &orders, &selection(Some(5), None)).await;

        assert!(matches!(
            result,
            Err(DomainError::Validation(
                ValidationError::PaymentMethodRequired
            ))
        ));
    }

    #[tokio::test]
    async fn test_remote_failure_leaves_cart_untouched() {
        let (mut cart, orders, _) = checkout_fixture().await;
        let first = cart.cart().lines()[0].cart_item_id;
        cart.toggle_selection(first, true);
        orders.set_fail_on_place(true);

        let result = place_order(&mut cart, &orders, &selection(Some(5), Some(cash()))).await;

        assert!(matches!(result, Err(DomainError::Remote(_))));
        assert!(cart.cart().is_selected(first));
        assert_eq!(cart.totals().total_item_count, 3);
        assert_eq!(orders.order_count(), 0);
    }

    #[tokio::test]
    async fn test_removed_lines_are_never_placed() {
        let (mut cart, orders, _) = checkout_fixture().await;
        let lines: Vec<CartItemId> = cart
            .cart()
            .lines()
            .iter()
            .map(|l| l.cart_item_id)
            .collect();
        cart.toggle_selection(lines[0], true);
        cart.toggle_selection(lines[1], true);

        cart.remove_line(lines[0]).await.unwrap();

        let receipt = place_order(&mut cart, &orders, &selection(Some(5), Some(cash())))
            .await
            .unwrap();

        assert_eq!(receipt.orders.len(), 1);
        assert_eq!(receipt.orders[0].products[0].product_id, ProductId::new(20));
    }

    #[tokio::test]
    async fn test_receipt_estimates_delivery_a_week_out() {
        let (mut cart, orders, _) = checkout_fixture().await;
        let first = cart.cart().lines()[0].cart_item_id;
        cart.toggle_selection(first, true);

        let receipt = place_order(&mut cart, &orders, &selection(Some(5), Some(cash())))
            .await
            .unwrap();

        let placed_on = receipt.orders[0].order_date.date_naive();
        assert_eq!(
            receipt.estimated_delivery,
            placed_on + chrono::Duration::days(7)
        );
    }
}
