//! Order collaborator trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use common::{AddressId, OrderId, OrderStatus, PaymentOption, PaymentStatus, ProductId, UserId};
use serde::Serialize;

use crate::error::RestError;
use crate::records::{OrderLineRecord, OrderRecord, Product};
use crate::session::SessionContext;

/// One line of an order placement request, as submitted to the backend.
///
/// The checkout flow builds one of these per selected cart line;
/// `payment_status` is `PAID` iff the customer pays now, else `PENDING`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderLine {
    pub user_id: UserId,
    pub address_id: AddressId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub payment_option: PaymentOption,
    pub payment_status: PaymentStatus,
}

/// Remote order operations.
#[async_trait]
pub trait OrderApi: Send + Sync {
    /// Places an order from the given lines; returns the created orders.
    async fn place_order(
        &self,
        session: &SessionContext,
        lines: &[PlaceOrderLine],
    ) -> Result<Vec<OrderRecord>, RestError>;

    /// Fetches all orders of the session's user.
    async fn orders_for_user(&self, session: &SessionContext)
    -> Result<Vec<OrderRecord>, RestError>;

    /// Fetches every order in the system (admin).
    async fn all_orders(&self, session: &SessionContext) -> Result<Vec<OrderRecord>, RestError>;

    /// Sets an order's status. The backend is the final authority and may
    /// reject transitions the client permitted.
    async fn update_order_status(
        &self,
        session: &SessionContext,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<(), RestError>;

    /// Sets an order's payment status.
    async fn update_payment_status(
        &self,
        session: &SessionContext,
        order_id: OrderId,
        status: PaymentStatus,
    ) -> Result<(), RestError>;

    /// Cancels an order.
    async fn cancel_order(
        &self,
        session: &SessionContext,
        order_id: OrderId,
    ) -> Result<(), RestError>;

    /// Starts a return for a delivered order.
    async fn return_order(
        &self,
        session: &SessionContext,
        order_id: OrderId,
    ) -> Result<(), RestError>;

    /// Fetches the order status enumeration used for admin dropdowns.
    async fn order_statuses(&self, session: &SessionContext)
    -> Result<Vec<OrderStatus>, RestError>;

    /// Fetches the payment status enumeration used for admin dropdowns.
    async fn payment_statuses(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<PaymentStatus>, RestError>;
}

#[derive(Debug, Default)]
struct InMemoryOrderState {
    orders: Vec<OrderRecord>,
    catalog: Vec<Product>,
    next_order_id: i64,
    fail_on_place: bool,
    fail_on_update: bool,
    fail_on_fetch: bool,
    calls: Vec<String>,
}

/// In-memory order service for testing placement and status flows.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderService {
    state: Arc<RwLock<InMemoryOrderState>>,
}

impl InMemoryOrderService {
    /// Creates an empty in-memory order service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an order service that resolves product names and prices from
    /// the given catalog when placing orders.
    pub fn with_catalog(products: Vec<Product>) -> Self {
        let service = Self::default();
        service.state.write().unwrap().catalog = products;
        service
    }

    /// Seeds an existing order, returning its id.
    pub fn seed_order(&self, order: OrderRecord) -> OrderId {
        let id = order.order_id;
        self.state.write().unwrap().orders.push(order);
        id
    }

    /// Configures order placement to fail until cleared.
    pub fn set_fail_on_place(&self, fail: bool) {
        self.state.write().unwrap().fail_on_place = fail;
    }

    /// Configures status updates, cancels, and returns to fail.
    pub fn set_fail_on_update(&self, fail: bool) {
        self.state.write().unwrap().fail_on_update = fail;
    }

    /// Configures order fetches to fail until cleared.
    pub fn set_fail_on_fetch(&self, fail: bool) {
        self.state.write().unwrap().fail_on_fetch = fail;
    }

    /// Returns how many recorded calls start with `prefix`.
    pub fn call_count(&self, prefix: &str) -> usize {
        self.state
            .read()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    /// Returns the number of orders currently held.
    pub fn order_count(&self) -> usize {
        self.state.read().unwrap().orders.len()
    }

    /// Returns a stored order by id.
    pub fn order(&self, order_id: OrderId) -> Option<OrderRecord> {
        self.state
            .read()
            .unwrap()
            .orders
            .iter()
            .find(|o| o.order_id == order_id)
            .cloned()
    }

    fn injected_failure() -> RestError {
        RestError::from_status(500, "injected order failure")
    }
}

#[async_trait]
impl OrderApi for InMemoryOrderService {
    async fn place_order(
        &self,
        _session: &SessionContext,
        lines: &[PlaceOrderLine],
    ) -> Result<Vec<OrderRecord>, RestError> {
        let mut state = self.state.write().unwrap();
        state.calls.push(format!("place_order({} lines)", lines.len()));

        if state.fail_on_place {
            return Err(Self::injected_failure());
        }
        if lines.is_empty() {
            return Err(RestError::from_status(422, "no order lines"));
        }

        let mut created = Vec::with_capacity(lines.len());
        for line in lines {
            let product = state
                .catalog
                .iter()
                .find(|p| p.product_id == line.product_id)
                .cloned()
                .ok_or_else(|| RestError::from_status(404, "product not found"))?;

            state.next_order_id += 1;
            let order = OrderRecord {
                order_id: OrderId::new(state.next_order_id),
                user_id: line.user_id,
                address_id: line.address_id,
                products: vec![OrderLineRecord {
                    product_id: product.product_id,
                    product_name: product.product_name,
                    quantity: line.quantity,
                    unit_price: product.product_price,
                }],
                order_status: OrderStatus::Pending,
                payment_status: line.payment_status,
                payment_option: line.payment_option,
                order_date: Utc::now(),
            };
            state.orders.push(order.clone());
            created.push(order);
        }
        Ok(created)
    }

    async fn orders_for_user(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<OrderRecord>, RestError> {
        let mut state = self.state.write().unwrap();
        state
            .calls
            .push(format!("orders_for_user({})", session.user_id()));

        if state.fail_on_fetch {
            return Err(Self::injected_failure());
        }
        Ok(state
            .orders
            .iter()
            .filter(|o| o.user_id == session.user_id())
            .cloned()
            .collect())
    }

    async fn all_orders(&self, _session: &SessionContext) -> Result<Vec<OrderRecord>, RestError> {
        let mut state = self.state.write().unwrap();
        state.calls.push("all_orders".to_string());

        if state.fail_on_fetch {
            return Err(Self::injected_failure());
        }
        Ok(state.orders.clone())
    }

    async fn update_order_status(
        &self,
        _session: &SessionContext,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<(), RestError> {
        let mut state = self.state.write().unwrap();
        state
            .calls
            .push(format!("update_order_status({order_id}, {status})"));

        if state.fail_on_update {
            return Err(Self::injected_failure());
        }
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.order_id == order_id)
            .ok_or_else(|| RestError::from_status(404, "order not found"))?;
        order.order_status = status;
        Ok(())
    }

    async fn update_payment_status(
        &self,
        _session: &SessionContext,
        order_id: OrderId,
        status: PaymentStatus,
    ) -> Result<(), RestError> {
        let mut state = self.state.write().unwrap();
        state
            .calls
            .push(format!("update_payment_status({order_id}, {status})"));

        if state.fail_on_update {
            return Err(Self::injected_failure());
        }
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.order_id == order_id)
            .ok_or_else(|| RestError::from_status(404, "order not found"))?;
        order.payment_status = status;
        Ok(())
    }

    async fn cancel_order(
        &self,
        _session: &SessionContext,
        order_id: OrderId,
    ) -> Result<(), RestError> {
        let mut state = self.state.write().unwrap();
        state.calls.push(format!("cancel_order({order_id})"));

        if state.fail_on_update {
            return Err(Self::injected_failure());
        }
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.order_id == order_id)
            .ok_or_else(|| RestError::from_status(404, "order not found"))?;
        order.order_status = OrderStatus::Cancelled;
        Ok(())
    }

    async fn return_order(
        &self,
        _session: &SessionContext,
        order_id: OrderId,
    ) -> Result<(), RestError> {
        let mut state = self.state.write().unwrap();
        state.calls.push(format!("return_order({order_id})"));

        if state.fail_on_update {
            return Err(Self::injected_failure());
        }
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.order_id == order_id)
            .ok_or_else(|| RestError::from_status(404, "order not found"))?;
        order.order_status = OrderStatus::Returned;
        order.payment_status = PaymentStatus::RefundInitiated;
        Ok(())
    }

    async fn order_statuses(
        &self,
        _session: &SessionContext,
    ) -> Result<Vec<OrderStatus>, RestError> {
        Ok(OrderStatus::ALL.to_vec())
    }

    async fn payment_statuses(
        &self,
        _session: &SessionContext,
    ) -> Result<Vec<PaymentStatus>, RestError> {
        Ok(PaymentStatus::ALL.to_vec())
    }
}
