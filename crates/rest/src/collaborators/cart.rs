//! Cart collaborator trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{CartItemId, ProductId};

use crate::error::RestError;
use crate::records::{CartEntry, Product};
use crate::session::SessionContext;

/// Remote cart operations.
///
/// The backend owns the cart; the client mirrors it. Quantity changes are
/// keyed by product id (matching the backend's endpoints), deletion by the
/// backend-assigned cart item id.
#[async_trait]
pub trait CartApi: Send + Sync {
    /// Fetches the full cart snapshot for the session's user.
    async fn items_for_user(&self, session: &SessionContext) -> Result<Vec<CartEntry>, RestError>;

    /// Adds a product to the cart; the backend assigns the cart item id.
    async fn add_to_cart(
        &self,
        session: &SessionContext,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), RestError>;

    /// Deletes one cart line by its id.
    async fn delete_item(
        &self,
        session: &SessionContext,
        cart_item_id: CartItemId,
    ) -> Result<(), RestError>;

    /// Increments the quantity of the line holding this product by one.
    async fn increase_quantity(
        &self,
        session: &SessionContext,
        product_id: ProductId,
    ) -> Result<(), RestError>;

    /// Decrements the quantity of the line holding this product by one.
    async fn decrease_quantity(
        &self,
        session: &SessionContext,
        product_id: ProductId,
    ) -> Result<(), RestError>;
}

#[derive(Debug, Default)]
struct InMemoryCartState {
    entries: Vec<CartEntry>,
    catalog: Vec<Product>,
    next_cart_item_id: i64,
    fail_on_fetch: bool,
    fail_on_mutation: bool,
    calls: Vec<String>,
}

/// In-memory cart service for testing optimistic updates and rollback.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartService {
    state: Arc<RwLock<InMemoryCartState>>,
}

impl InMemoryCartService {
    /// Creates an empty in-memory cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cart service whose catalog contains the given products.
    pub fn with_catalog(products: Vec<Product>) -> Self {
        let service = Self::default();
        service.state.write().unwrap().catalog = products;
        service
    }

    /// Configures fetches to fail until cleared.
    pub fn set_fail_on_fetch(&self, fail: bool) {
        self.state.write().unwrap().fail_on_fetch = fail;
    }

    /// Configures mutations (add, delete, quantity changes) to fail.
    pub fn set_fail_on_mutation(&self, fail: bool) {
        self.state.write().unwrap().fail_on_mutation = fail;
    }

    /// Returns every call made so far, in order, as `"name(args)"` strings.
    pub fn recorded_calls(&self) -> Vec<String> {
        self.state.read().unwrap().calls.clone()
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

    /// Returns the number of lines currently in the remote cart.
    pub fn entry_count(&self) -> usize {
        self.state.read().unwrap().entries.len()
    }

    fn injected_failure() -> RestError {
        RestError::from_status(500, "injected cart failure")
    }
}

#[async_trait]
impl CartApi for InMemoryCartService {
    async fn items_for_user(&self, session: &SessionContext) -> Result<Vec<CartEntry>, RestError> {
        let mut state = self.state.write().unwrap();
        state
            .calls
            .push(format!("items_for_user({})", session.user_id()));

        if state.fail_on_fetch {
            return Err(Self::injected_failure());
        }
        Ok(state.entries.clone())
    }

    async fn add_to_cart(
        &self,
        _session: &SessionContext,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), RestError> {
        let mut state = self.state.write().unwrap();
        state
            .calls
            .push(format!("add_to_cart({product_id}, {quantity})"));

        if state.fail_on_mutation {
            return Err(Self::injected_failure());
        }

        if let Some(entry) = state
            .entries
            .iter_mut()
            .find(|e| e.product.product_id == product_id)
        {
            entry.product_quantity += quantity;
            return Ok(());
        }

        let product = state
            .catalog
            .iter()
            .find(|p| p.product_id == product_id)
            .cloned()
            .ok_or_else(|| RestError::from_status(404, "product not found"))?;

        state.next_cart_item_id += 1;
        let cart_item_id = CartItemId::new(state.next_cart_item_id);
        state.entries.push(CartEntry {
            cart_item_id,
            product,
            product_quantity: quantity,
        });
        Ok(())
    }

    async fn delete_item(
        &self,
        _session: &SessionContext,
        cart_item_id: CartItemId,
    ) -> Result<(), RestError> {
        let mut state = self.state.write().unwrap();
        state.calls.push(format!("delete_item({cart_item_id})"));

        if state.fail_on_mutation {
            return Err(Self::injected_failure());
        }

        let before = state.entries.len();
        state.entries.retain(|e| e.cart_item_id != cart_item_id);
        if state.entries.len() == before {
            return Err(RestError::from_status(404, "cart item not found"));
        }
        Ok(())
    }

    async fn increase_quantity(
        &self,
        _session: &SessionContext,
        product_id: ProductId,
    ) -> Result<(), RestError> {
        let mut state = self.state.write().unwrap();
        state.calls.push(format!("increase_quantity({product_id})"));

        if state.fail_on_mutation {
            return Err(Self::injected_failure());
        }

        let entry = state
            .entries
            .iter_mut()
            .find(|e| e.product.product_id == product_id)
            .ok_or_else(|| RestError::from_status(404, "cart item not found"))?;
        entry.product_quantity += 1;
        Ok(())
    }

    async fn decrease_quantity(
        &self,
        _session: &SessionContext,
        product_id: ProductId,
    ) -> Result<(), RestError> {
        let mut state = self.state.write().unwrap();
        state.calls.push(format!("decrease_quantity({product_id})"));

        if state.fail_on_mutation {
            return Err(Self::injected_failure());
        }

        let entry = state
            .entries
            .iter_mut()
            .find(|e| e.product.product_id == product_id)
            .ok_or_else(|| RestError::from_status(404, "cart item not found"))?;
        entry.product_quantity = entry.product_quantity.saturating_sub(1).max(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Money, UserId};

    fn widget() -> Product {
        Product {
            product_id: ProductId::new(1),
            product_name: "Widget".into(),
            product_category: "Tools".into(),
            product_description: String::new(),
            product_price: Money::from_cents(1000),
            product_quantity: 10,
        }
    }

    fn session() -> SessionContext {
        SessionContext::new(UserId::new(1), "token")
    }

    #[tokio::test]
    async fn test_add_then_fetch() {
        let service = InMemoryCartService::with_catalog(vec![widget()]);
        let session = session();

        service
            .add_to_cart(&session, ProductId::new(1), 2)
            .await
            .unwrap();

        let items = service.items_for_user(&session).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_quantity, 2);
        assert_eq!(items[0].cart_item_id, CartItemId::new(1));
    }

    #[tokio::test]
    async fn test_add_same_product_merges() {
        let service = InMemoryCartService::with_catalog(vec![widget()]);
        let session = session();

        service
            .add_to_cart(&session, ProductId::new(1), 2)
            .await
            .unwrap();
        service
            .add_to_cart(&session, ProductId::new(1), 3)
            .await
            .unwrap();

        let items = service.items_for_user(&session).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_quantity, 5);
    }

    #[tokio::test]
    async fn test_injected_mutation_failure() {
        let service = InMemoryCartService::with_catalog(vec![widget()]);
        let session = session();
        service.set_fail_on_mutation(true);

        let result = service.add_to_cart(&session, ProductId::new(1), 1).await;
        assert!(result.is_err());
        assert_eq!(service.entry_count(), 0);
    }

    #[tokio::test]
    async fn test_calls_are_recorded() {
        let service = InMemoryCartService::with_catalog(vec![widget()]);
        let session = session();

        service
            .add_to_cart(&session, ProductId::new(1), 1)
            .await
            .unwrap();
        service
            .increase_quantity(&session, ProductId::new(1))
            .await
            .unwrap();

        assert_eq!(service.call_count("add_to_cart"), 1);
        assert_eq!(service.call_count("increase_quantity"), 1);
        assert_eq!(service.call_count("decrease_quantity"), 0);
    }

    #[tokio::test]
    async fn test_delete_unknown_item_is_not_found() {
        let service = InMemoryCartService::new();
        let result = service.delete_item(&session(), CartItemId::new(99)).await;
        assert_eq!(result.unwrap_err().status_code(), Some(404));
    }
}
