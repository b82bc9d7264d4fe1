//! HTTP implementation of the collaborator traits, backed by `reqwest`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use common::{CartItemId, Money, OrderId, OrderStatus, PaymentStatus, ProductId};
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;

use crate::collaborators::{
    AuthApi, CartApi, OrderApi, PlaceOrderLine, ProductApi, ProfileApi, SalesApi,
};
use crate::envelope::ApiResponse;
use crate::error::RestError;
use crate::records::{
    Address, CartEntry, LoginRequest, LoginResponse, NewAddress, NewPaymentMethod, NewProduct,
    OrderRecord, PaymentMethod, Product, RegisterRequest, UserProfile,
};
use crate::session::SessionContext;

/// HTTP client for the storefront backend.
///
/// One instance serves all collaborators; every authenticated request takes
/// its `Authorization` value from the [`SessionContext`] passed in, so the
/// client itself holds no user state.
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
    http: reqwest::Client,
}

fn network(err: reqwest::Error) -> RestError {
    RestError::Network {
        detail: err.to_string(),
    }
}

/// Flattens the backend's `[{ kind: value }]` payment-method maps into
/// explicit records. Entries with more than one key keep only the first.
fn flatten_payment_methods(raw: Vec<HashMap<String, String>>) -> Vec<PaymentMethod> {
    raw.into_iter()
        .filter_map(|map| {
            let mut entries: Vec<(String, String)> = map.into_iter().collect();
            entries.sort();
            entries.into_iter().next()
        })
        .map(|(kind, value)| PaymentMethod { kind, value })
        .collect()
}

impl RestClient {
    /// Creates a client for the given base URL, e.g. `http://localhost:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Creates a client with a per-request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RestError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(network)?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Sends a request and maps transport and status failures into the
    /// error taxonomy. Connectivity problems become [`RestError::Network`];
    /// any non-2xx response becomes [`RestError::Status`].
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, RestError> {
        let response = request.send().await.map_err(|err| {
            tracing::debug!(error = %err, "request did not reach the server");
            network(err)
        })?;
        let status = response.status();
        if !status.is_success() {
            let url = response.url().to_string();
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%status, %url, "request rejected");
            return Err(RestError::from_status(status.as_u16(), body));
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RestError> {
        let text = response.text().await.map_err(network)?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        session: &SessionContext,
        path: &str,
    ) -> Result<T, RestError> {
        let request = self
            .http
            .get(self.url(path))
            .header(AUTHORIZATION, session.authorization_value());
        Self::decode(self.execute(request).await?).await
    }

    async fn put_empty(&self, session: &SessionContext, path: &str) -> Result<(), RestError> {
        let request = self
            .http
            .put(self.url(path))
            .header(AUTHORIZATION, session.authorization_value())
            .json(&serde_json::json!({}));
        self.execute(request).await?;
        Ok(())
    }

    async fn post_empty(&self, session: &SessionContext, path: &str) -> Result<(), RestError> {
        let request = self
            .http
            .post(self.url(path))
            .header(AUTHORIZATION, session.authorization_value())
            .json(&serde_json::json!({}));
        self.execute(request).await?;
        Ok(())
    }
}

#[async_trait]
impl AuthApi for RestClient {
    async fn login_user(&self, request: &LoginRequest) -> Result<LoginResponse, RestError> {
        let req = self.http.post(self.url("/users/login-user")).json(request);
        Self::decode(self.execute(req).await?).await
    }

    async fn login_admin(&self, request: &LoginRequest) -> Result<LoginResponse, RestError> {
        let req = self.http.post(self.url("/admins/login-admin")).json(request);
        Self::decode(self.execute(req).await?).await
    }

    async fn register_user(&self, request: &RegisterRequest) -> Result<(), RestError> {
        let req = self
            .http
            .post(self.url("/users/register-user"))
            .json(request);
        self.execute(req).await?;
        Ok(())
    }
}

#[async_trait]
impl ProductApi for RestClient {
    async fn list(&self, session: &SessionContext) -> Result<Vec<Product>, RestError> {
        let envelope: ApiResponse<Vec<Product>> =
            self.get_json(session, "/products/getall").await?;
        let products = envelope.into_data()?;
        for product in &products {
            product.validate()?;
        }
        Ok(products)
    }

    async fn add(&self, session: &SessionContext, product: &NewProduct) -> Result<(), RestError> {
        let request = self
            .http
            .post(self.url("/products/add-product"))
            .header(AUTHORIZATION, session.authorization_value())
            .json(product);
        self.execute(request).await?;
        Ok(())
    }

    async fn update(&self, session: &SessionContext, product: &Product) -> Result<(), RestError> {
        let path = format!("/products/update-product/{}", product.product_id);
        let request = self
            .http
            .put(self.url(&path))
            .header(AUTHORIZATION, session.authorization_value())
            .json(product);
        self.execute(request).await?;
        Ok(())
    }

    async fn delete(
        &self,
        session: &SessionContext,
        product_id: ProductId,
    ) -> Result<(), RestError> {
        let path = format!("/products/delete-by-id/{product_id}");
        let request = self
            .http
            .delete(self.url(&path))
            .header(AUTHORIZATION, session.authorization_value());
        self.execute(request).await?;
        Ok(())
    }

    async fn adjust_quantity(
        &self,
        session: &SessionContext,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<(), RestError> {
        let path = format!("/products/update-quantity/{product_id}/{quantity}");
        self.put_empty(session, &path).await
    }
}

#[async_trait]
impl CartApi for RestClient {
    async fn items_for_user(&self, session: &SessionContext) -> Result<Vec<CartEntry>, RestError> {
        let path = format!("/cart/get-all-by-user/{}", session.user_id());
        let envelope: ApiResponse<Vec<CartEntry>> = self.get_json(session, &path).await?;
        let entries = envelope.into_data()?;
        for entry in &entries {
            entry.validate()?;
        }
        Ok(entries)
    }

    async fn add_to_cart(
        &self,
        session: &SessionContext,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), RestError> {
        let path = format!("/cart/add-to-cart/{}/{product_id}", session.user_id());
        let body = serde_json::json!({
            "userId": session.user_id(),
            "productId": product_id,
            "quantity": quantity,
        });
        let request = self
            .http
            .post(self.url(&path))
            .header(AUTHORIZATION, session.authorization_value())
            .json(&body);
        self.execute(request).await?;
        Ok(())
    }

    async fn delete_item(
        &self,
        session: &SessionContext,
        cart_item_id: CartItemId,
    ) -> Result<(), RestError> {
        let path = format!("/cart/delete-by-cartid/{cart_item_id}");
        let request = self
            .http
            .delete(self.url(&path))
            .header(AUTHORIZATION, session.authorization_value());
        self.execute(request).await?;
        Ok(())
    }

    async fn increase_quantity(
        &self,
        session: &SessionContext,
        product_id: ProductId,
    ) -> Result<(), RestError> {
        let path = format!("/cart/increase-cart/{}/{product_id}", session.user_id());
        self.put_empty(session, &path).await
    }

    async fn decrease_quantity(
        &self,
        session: &SessionContext,
        product_id: ProductId,
    ) -> Result<(), RestError> {
        let path = format!("/cart/decrease-cart/{}/{product_id}", session.user_id());
        self.put_empty(session, &path).await
    }
}

#[async_trait]
impl OrderApi for RestClient {
    async fn place_order(
        &self,
        session: &SessionContext,
        lines: &[PlaceOrderLine],
    ) -> Result<Vec<OrderRecord>, RestError> {
        let request = self
            .http
            .post(self.url("/orders/place-order"))
            .header(AUTHORIZATION, session.authorization_value())
            .json(lines);
        let envelope: ApiResponse<Vec<OrderRecord>> =
            Self::decode(self.execute(request).await?).await?;
        envelope.into_data()
    }

    async fn orders_for_user(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<OrderRecord>, RestError> {
        let path = format!("/orders/get-by-user/{}", session.user_id());
        self.get_json(session, &path).await
    }

    async fn all_orders(&self, session: &SessionContext) -> Result<Vec<OrderRecord>, RestError> {
        let envelope: ApiResponse<Vec<OrderRecord>> =
            self.get_json(session, "/orders/get-all").await?;
        envelope.into_data()
    }

    async fn update_order_status(
        &self,
        session: &SessionContext,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<(), RestError> {
        let path = format!("/orders/update-orderstatus/{order_id}/{status}");
        self.put_empty(session, &path).await
    }

    async fn update_payment_status(
        &self,
        session: &SessionContext,
        order_id: OrderId,
        status: PaymentStatus,
    ) -> Result<(), RestError> {
        let path = format!("/orders/update-paymentstatus/{order_id}/{status}");
        self.put_empty(session, &path).await
    }

    async fn cancel_order(
        &self,
        session: &SessionContext,
        order_id: OrderId,
    ) -> Result<(), RestError> {
        let path = format!("/orders/cancel-order/{order_id}");
        self.post_empty(session, &path).await
    }

    async fn return_order(
        &self,
        session: &SessionContext,
        order_id: OrderId,
    ) -> Result<(), RestError> {
        let path = format!("/orders/return-product/{order_id}");
        self.post_empty(session, &path).await
    }

    async fn order_statuses(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<OrderStatus>, RestError> {
        self.get_json(session, "/orders/get-orderstatus").await
    }

    async fn payment_statuses(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<PaymentStatus>, RestError> {
        self.get_json(session, "/orders/get-payments").await
    }
}

#[async_trait]
impl ProfileApi for RestClient {
    async fn user_details(&self, session: &SessionContext) -> Result<UserProfile, RestError> {
        let path = format!("/admins/get-details/{}", session.user_id());
        self.get_json(session, &path).await
    }

    async fn addresses(&self, session: &SessionContext) -> Result<Vec<Address>, RestError> {
        let path = format!("/users/get-address/{}", session.user_id());
        self.get_json(session, &path).await
    }

    async fn add_address(
        &self,
        session: &SessionContext,
        address: &NewAddress,
    ) -> Result<(), RestError> {
        let request = self
            .http
            .post(self.url("/users/add-address"))
            .header(AUTHORIZATION, session.authorization_value())
            .json(address);
        self.execute(request).await?;
        Ok(())
    }

    async fn payment_methods(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<PaymentMethod>, RestError> {
        let path = format!("/users/get-user-payment/{}", session.user_id());
        let raw: Vec<HashMap<String, String>> = self.get_json(session, &path).await?;
        Ok(flatten_payment_methods(raw))
    }

    async fn add_payment_method(
        &self,
        session: &SessionContext,
        method: &NewPaymentMethod,
    ) -> Result<(), RestError> {
        let request = self
            .http
            .post(self.url("/users/add-payment"))
            .header(AUTHORIZATION, session.authorization_value())
            .json(method);
        self.execute(request).await?;
        Ok(())
    }
}

#[async_trait]
impl SalesApi for RestClient {
    async fn total_revenue(&self, session: &SessionContext) -> Result<Money, RestError> {
        self.get_json(session, "/sales/total-revenue").await
    }

    async fn total_orders(&self, session: &SessionContext) -> Result<u64, RestError> {
        self.get_json(session, "/sales/total-orders").await
    }

    async fn orders_per_day(
        &self,
        session: &SessionContext,
    ) -> Result<HashMap<String, u64>, RestError> {
        self.get_json(session, "/sales/orders-per-day").await
    }

    async fn top_products(
        &self,
        session: &SessionContext,
    ) -> Result<HashMap<String, u64>, RestError> {
        self.get_json(session, "/sales/top-products").await
    }

    async fn orders_count(
        &self,
        session: &SessionContext,
        status: OrderStatus,
    ) -> Result<u64, RestError> {
        let path = format!("/sales/orders-count/{status}");
        self.get_json(session, &path).await
    }

    async fn daily_revenue(
        &self,
        session: &SessionContext,
    ) -> Result<HashMap<String, Money>, RestError> {
        self.get_json(session, "/sales/daily-revenue").await
    }

    async fn track_visitor(&self, session: &SessionContext, page: &str) -> Result<(), RestError> {
        let body = serde_json::json!({
            "sessionId": session.visitor_session(),
            "page": page,
            "timestamp": Utc::now(),
        });
        let request = self
            .http
            .post(self.url("/sales/track-visitor"))
            .header(AUTHORIZATION, session.authorization_value())
            .json(&body);
        self.execute(request).await?;
        Ok(())
    }

    async fn total_visitors(&self, session: &SessionContext) -> Result<u64, RestError> {
        self.get_json(session, "/sales/total-visitors").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = RestClient::new("http://localhost:8080/");
        assert_eq!(
            client.url("/orders/get-all"),
            "http://localhost:8080/orders/get-all"
        );

        let client = RestClient::new("http://localhost:8080");
        assert_eq!(
            client.url("/orders/get-all"),
            "http://localhost:8080/orders/get-all"
        );
    }

    #[test]
    fn test_flatten_payment_methods() {
        let raw = vec![
            HashMap::from([("UPI".to_string(), "asha@upi".to_string())]),
            HashMap::from([("CARD".to_string(), "**** 4242".to_string())]),
        ];
        let methods = flatten_payment_methods(raw);
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].kind, "UPI");
        assert_eq!(methods[0].value, "asha@upi");
        assert_eq!(methods[1].kind, "CARD");
    }

    #[test]
    fn test_flatten_skips_empty_maps() {
        let methods = flatten_payment_methods(vec![HashMap::new()]);
        assert!(methods.is_empty());
    }
}
