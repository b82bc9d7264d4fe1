//! Order book: status-edit guards, cancel/return, and list maintenance.

pub mod delivery;

use common::{OrderId, OrderStatus, PaymentStatus};
use rest::{OrderApi, OrderRecord, SessionContext};

use crate::error::{DomainError, ValidationError};

/// Returns true if the client may offer a status edit for this order.
///
/// Terminal orders (delivered, cancelled, returned) lock their status.
pub fn can_edit_order_status(order: &OrderRecord) -> bool {
    order.order_status.can_edit()
}

/// Returns true if the client may offer a payment-status edit.
pub fn can_edit_payment_status(order: &OrderRecord) -> bool {
    order.payment_status.can_edit()
}

/// Returns true if this order may be marked delivered: only once its
/// payment is settled.
pub fn can_transition_to_delivered(order: &OrderRecord) -> bool {
    order.payment_status.settles_delivery()
}

/// A locally held list of orders (one user's, or all of them for admins)
/// with guarded status edits against the order collaborator.
///
/// Status changes are not applied optimistically: the local record is only
/// replaced once the remote confirms, unlike cart quantity edits.
pub struct OrderBook<O: OrderApi> {
    api: O,
    session: SessionContext,
    orders: Vec<OrderRecord>,
}

impl<O: OrderApi> OrderBook<O> {
    /// Creates an empty book.
    pub fn new(api: O, session: SessionContext) -> Self {
        Self {
            api,
            session,
            orders: Vec::new(),
        }
    }

    /// Returns the loaded orders.
    pub fn orders(&self) -> &[OrderRecord] {
        &self.orders
    }

    /// Returns a loaded order by id.
    pub fn order(&self, order_id: OrderId) -> Option<&OrderRecord> {
        self.orders.iter().find(|o| o.order_id == order_id)
    }

    /// Loads the session user's orders.
    ///
    /// On remote failure the book is left empty and the error returned;
    /// list pages render the empty state and log.
    #[tracing::instrument(skip(self), fields(user = %self.session.user_id()))]
    pub async fn load_for_user(&mut self) -> Result<(), DomainError> {
        match self.api.orders_for_user(&self.session).await {
            Ok(orders) => {
                self.orders = orders;
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load orders, showing empty list");
                self.orders.clear();
                Err(err.into())
            }
        }
    }

    /// Loads every order in the system (admin view).
    #[tracing::instrument(skip(self))]
    pub async fn load_all(&mut self) -> Result<(), DomainError> {
        match self.api.all_orders(&self.session).await {
            Ok(orders) => {
                self.orders = orders;
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load all orders, showing empty list");
                self.orders.clear();
                Err(err.into())
            }
        }
    }

    /// Changes an order's status.
    ///
    /// Guards run first and reject without a remote call: terminal orders
    /// are locked, and `DELIVERED` additionally requires the payment to be
    /// `PAID`. On remote confirmation the local record's status is replaced
    /// in place.
    #[tracing::instrument(skip(self))]
    pub async fn update_order_status(
        &mut self,
        order_id: OrderId,
        new_status: OrderStatus,
    ) -> Result<(), DomainError> {
        let order = self
            .order(order_id)
            .ok_or(ValidationError::OrderNotFound { order_id })?;

        if !can_edit_order_status(order) {
            return Err(ValidationError::OrderStatusLocked {
                status: order.order_status,
            }
            .into());
        }
        if new_status == OrderStatus::Delivered && !can_transition_to_delivered(order) {
            return Err(ValidationError::DeliveryRequiresPayment.into());
        }

        self.api
            .update_order_status(&self.session, order_id, new_status)
            .await?;

        if let Some(order) = self.orders.iter_mut().find(|o| o.order_id == order_id) {
            order.order_status = new_status;
        }
        Ok(())
    }

    /// Changes an order's payment status, guarded against settled payments.
    #[tracing::instrument(skip(self))]
    pub async fn update_payment_status(
        &mut self,
        order_id: OrderId,
        new_status: PaymentStatus,
    ) -> Result<(), DomainError> {
        let order = self
            .order(order_id)
            .ok_or(ValidationError::OrderNotFound { order_id })?;

        if !can_edit_payment_status(order) {
            return Err(ValidationError::PaymentStatusLocked {
                status: order.payment_status,
            }
            .into());
        }

        self.api
            .update_payment_status(&self.session, order_id, new_status)
            .await?;

        if let Some(order) = self.orders.iter_mut().find(|o| o.order_id == order_id) {
            order.payment_status = new_status;
        }
        Ok(())
    }

    /// Cancels an order. Rejected locally for terminal orders; on remote
    /// confirmation the order leaves the local list.
    #[tracing::instrument(skip(self))]
    pub async fn cancel(&mut self, order_id: OrderId) -> Result<(), DomainError> {
        let order = self
            .order(order_id)
            .ok_or(ValidationError::OrderNotFound { order_id })?;

        if order.order_status.is_terminal() {
            return Err(ValidationError::OrderStatusLocked {
                status: order.order_status,
            }
            .into());
        }

        self.api.cancel_order(&self.session, order_id).await?;
        self.orders.retain(|o| o.order_id != order_id);
        Ok(())
    }

    /// Starts a return. Only delivered orders can be returned; on remote
    /// confirmation the order leaves the local list.
    #[tracing::instrument(skip(self))]
    pub async fn return_order(&mut self, order_id: OrderId) -> Result<(), DomainError> {
        let order = self
            .order(order_id)
            .ok_or(ValidationError::OrderNotFound { order_id })?;

        if order.order_status != OrderStatus::Delivered {
            return Err(ValidationError::ReturnRequiresDelivery.into());
        }

        self.api.return_order(&self.session, order_id).await?;
        self.orders.retain(|o| o.order_id != order_id);
        Ok(())
    }

    /// Fetches the order-status choices for admin dropdowns, falling back
    /// to the built-in enumeration when the endpoint is unreachable.
    pub async fn status_choices(&self) -> Vec<OrderStatus> {
        match self.api.order_statuses(&self.session).await {
            Ok(statuses) => statuses,
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch order statuses, using built-ins");
                OrderStatus::ALL.to_vec()
            }
        }
    }

    /// Fetches the payment-status choices for admin dropdowns, with the
    /// same fallback.
    pub async fn payment_status_choices(&self) -> Vec<PaymentStatus> {
        match self.api.payment_statuses(&self.session).await {
            Ok(statuses) => statuses,
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch payment statuses, using built-ins");
                PaymentStatus::ALL.to_vec()
            }
        }
    }
}
