//! Sales collaborator trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{Money, OrderStatus};

use crate::error::RestError;
use crate::session::SessionContext;

/// Remote sales/statistics operations (admin dashboard data) plus the
/// visitor tracking the storefront reports into the same service.
///
/// Per-day maps are keyed by ISO `YYYY-MM-DD` date strings, which is also
/// the order the dashboard sorts them in.
#[async_trait]
pub trait SalesApi: Send + Sync {
    /// Total revenue across all orders.
    async fn total_revenue(&self, session: &SessionContext) -> Result<Money, RestError>;

    /// Total number of orders ever placed.
    async fn total_orders(&self, session: &SessionContext) -> Result<u64, RestError>;

    /// Orders placed per day.
    async fn orders_per_day(
        &self,
        session: &SessionContext,
    ) -> Result<HashMap<String, u64>, RestError>;

    /// Units sold per product name.
    async fn top_products(
        &self,
        session: &SessionContext,
    ) -> Result<HashMap<String, u64>, RestError>;

    /// Number of orders currently in the given status.
    async fn orders_count(
        &self,
        session: &SessionContext,
        status: OrderStatus,
    ) -> Result<u64, RestError>;

    /// Revenue per day.
    async fn daily_revenue(
        &self,
        session: &SessionContext,
    ) -> Result<HashMap<String, Money>, RestError>;

    /// Reports a page visit under the session's visitor id.
    async fn track_visitor(&self, session: &SessionContext, page: &str) -> Result<(), RestError>;

    /// Total distinct visitors seen.
    async fn total_visitors(&self, session: &SessionContext) -> Result<u64, RestError>;
}

#[derive(Debug, Default)]
struct InMemorySalesState {
    total_revenue: Money,
    total_orders: u64,
    orders_per_day: HashMap<String, u64>,
    top_products: HashMap<String, u64>,
    orders_by_status: HashMap<OrderStatus, u64>,
    daily_revenue: HashMap<String, Money>,
    visits: Vec<(String, String)>, // (visitor session, page)
    fail_on_fetch: bool,
}

/// In-memory sales service for tests.
#[derive(Debug, Clone, Default)]
pub struct InMemorySalesService {
    state: Arc<RwLock<InMemorySalesState>>,
}

impl InMemorySalesService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the headline totals.
    pub fn set_totals(&self, revenue: Money, orders: u64) {
        let mut state = self.state.write().unwrap();
        state.total_revenue = revenue;
        state.total_orders = orders;
    }

    /// Seeds the orders-per-day map.
    pub fn set_orders_per_day(&self, map: HashMap<String, u64>) {
        self.state.write().unwrap().orders_per_day = map;
    }

    /// Seeds the top-products map.
    pub fn set_top_products(&self, map: HashMap<String, u64>) {
        self.state.write().unwrap().top_products = map;
    }

    /// Seeds a per-status order count.
    pub fn set_status_count(&self, status: OrderStatus, count: u64) {
        self.state.write().unwrap().orders_by_status.insert(status, count);
    }

    /// Seeds the daily-revenue map.
    pub fn set_daily_revenue(&self, map: HashMap<String, Money>) {
        self.state.write().unwrap().daily_revenue = map;
    }

    /// Configures fetches to fail until cleared.
    pub fn set_fail_on_fetch(&self, fail: bool) {
        self.state.write().unwrap().fail_on_fetch = fail;
    }

    /// Returns the number of visits recorded.
    pub fn visit_count(&self) -> usize {
        self.state.read().unwrap().visits.len()
    }

    fn check_fetch(&self) -> Result<(), RestError> {
        if self.state.read().unwrap().fail_on_fetch {
            return Err(RestError::from_status(503, "injected sales failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl SalesApi for InMemorySalesService {
    async fn total_revenue(&self, _session: &SessionContext) -> Result<Money, RestError> {
        self.check_fetch()?;
        Ok(self.state.read().unwrap().total_revenue)
    }

    async fn total_orders(&self, _session: &SessionContext) -> Result<u64, RestError> {
        self.check_fetch()?;
        Ok(self.state.read().unwrap().total_orders)
    }

    async fn orders_per_day(
        &self,
        _session: &SessionContext,
    ) -> Result<HashMap<String, u64>, RestError> {
        self.check_fetch()?;
        Ok(self.state.read().unwrap().orders_per_day.clone())
    }

    async fn top_products(
        &self,
        _session: &SessionContext,
    ) -> Result<HashMap<String, u64>, RestError> {
        self.check_fetch()?;
        Ok(self.state.read().unwrap().top_products.clone())
    }

    async fn orders_count(
        &self,
        _session: &SessionContext,
        status: OrderStatus,
    ) -> Result<u64, RestError> {
        self.check_fetch()?;
        Ok(self
            .state
            .read()
            .unwrap()
            .orders_by_status
            .get(&status)
            .copied()
            .unwrap_or(0))
    }

    async fn daily_revenue(
        &self,
        _session: &SessionContext,
    ) -> Result<HashMap<String, Money>, RestError> {
        self.check_fetch()?;
        Ok(self.state.read().unwrap().daily_revenue.clone())
    }

    async fn track_visitor(&self, session: &SessionContext, page: &str) -> Result<(), RestError> {
        self.state
            .write()
            .unwrap()
            .visits
            .push((session.visitor_session().to_string(), page.to_string()));
        Ok(())
    }

    async fn total_visitors(&self, _session: &SessionContext) -> Result<u64, RestError> {
        self.check_fetch()?;
        let state = self.state.read().unwrap();
        let mut sessions: Vec<&String> = state.visits.iter().map(|(s, _)| s).collect();
        sessions.sort();
        sessions.dedup();
        Ok(sessions.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::UserId;

    fn session() -> SessionContext {
        SessionContext::new(UserId::new(1), "token")
    }

    #[tokio::test]
    async fn test_seeded_totals() {
        let service = InMemorySalesService::new();
        service.set_totals(Money::from_cents(123_400), 17);

        assert_eq!(
            service.total_revenue(&session()).await.unwrap().cents(),
            123_400
        );
        assert_eq!(service.total_orders(&session()).await.unwrap(), 17);
    }

    #[tokio::test]
    async fn test_unknown_status_count_is_zero() {
        let service = InMemorySalesService::new();
        assert_eq!(
            service
                .orders_count(&session(), OrderStatus::Shipped)
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_distinct_visitors() {
        let service = InMemorySalesService::new();
        let first = session();
        let second = session();

        service.track_visitor(&first, "home").await.unwrap();
        service.track_visitor(&first, "cart").await.unwrap();
        service.track_visitor(&second, "home").await.unwrap();

        assert_eq!(service.visit_count(), 3);
        assert_eq!(service.total_visitors(&first).await.unwrap(), 2);
    }
}
