//! Product collaborator trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::ProductId;

use crate::error::RestError;
use crate::records::{NewProduct, Product};
use crate::session::SessionContext;

/// Remote product catalog operations.
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// Lists the full catalog.
    async fn list(&self, session: &SessionContext) -> Result<Vec<Product>, RestError>;

    /// Adds a product; the backend assigns the id.
    async fn add(&self, session: &SessionContext, product: &NewProduct) -> Result<(), RestError>;

    /// Replaces a product's fields.
    async fn update(&self, session: &SessionContext, product: &Product) -> Result<(), RestError>;

    /// Deletes a product from the catalog.
    async fn delete(
        &self,
        session: &SessionContext,
        product_id: ProductId,
    ) -> Result<(), RestError>;

    /// Sets a product's stock quantity.
    async fn adjust_quantity(
        &self,
        session: &SessionContext,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<(), RestError>;
}

#[derive(Debug, Default)]
struct InMemoryProductState {
    products: Vec<Product>,
    next_product_id: i64,
    fail_on_mutation: bool,
}

/// In-memory product catalog for tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductService {
    state: Arc<RwLock<InMemoryProductState>>,
}

impl InMemoryProductService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the catalog with existing products.
    pub fn with_products(products: Vec<Product>) -> Self {
        let next = products.iter().map(|p| p.product_id.get()).max().unwrap_or(0);
        let service = Self::default();
        {
            let mut state = service.state.write().unwrap();
            state.products = products;
            state.next_product_id = next;
        }
        service
    }

    /// Configures mutations to fail until cleared.
    pub fn set_fail_on_mutation(&self, fail: bool) {
        self.state.write().unwrap().fail_on_mutation = fail;
    }

    fn injected_failure() -> RestError {
        RestError::from_status(500, "injected product failure")
    }
}

#[async_trait]
impl ProductApi for InMemoryProductService {
    async fn list(&self, _session: &SessionContext) -> Result<Vec<Product>, RestError> {
        Ok(self.state.read().unwrap().products.clone())
    }

    async fn add(&self, _session: &SessionContext, product: &NewProduct) -> Result<(), RestError> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_mutation {
            return Err(Self::injected_failure());
        }
        state.next_product_id += 1;
        let record = Product {
            product_id: ProductId::new(state.next_product_id),
            product_name: product.product_name.clone(),
            product_category: product.product_category.clone(),
            product_description: product.product_description.clone(),
            product_price: product.product_price,
            product_quantity: product.product_quantity,
        };
        record.validate()?;
        state.products.push(record);
        Ok(())
    }

    async fn update(&self, _session: &SessionContext, product: &Product) -> Result<(), RestError> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_mutation {
            return Err(Self::injected_failure());
        }
        product.validate()?;
        let existing = state
            .products
            .iter_mut()
            .find(|p| p.product_id == product.product_id)
            .ok_or_else(|| RestError::from_status(404, "product not found"))?;
        *existing = product.clone();
        Ok(())
    }

    async fn delete(
        &self,
        _session: &SessionContext,
        product_id: ProductId,
    ) -> Result<(), RestError> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_mutation {
            return Err(Self::injected_failure());
        }
        let before = state.products.len();
        state.products.retain(|p| p.product_id != product_id);
        if state.products.len() == before {
            return Err(RestError::from_status(404, "product not found"));
        }
        Ok(())
    }

    async fn adjust_quantity(
        &self,
        _session: &SessionContext,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<(), RestError> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_mutation {
            return Err(Self::injected_failure());
        }
        if quantity < 0 {
            return Err(RestError::from_status(422, "negative stock"));
        }
        let product = state
            .products
            .iter_mut()
            .find(|p| p.product_id == product_id)
            .ok_or_else(|| RestError::from_status(404, "product not found"))?;
        product.product_quantity = quantity;
        Ok(())
    }
}
