//! The sales overview snapshot and its derived statistics.

use std::collections::HashMap;

use common::{Money, OrderStatus};
use rest::{SalesApi, SessionContext};

use crate::stats;

/// One fetched snapshot of the dashboard's sales data.
///
/// Every field is read independently; a failing endpoint logs and leaves
/// its zero/empty default rather than surfacing an alert, so the dashboard
/// always renders.
#[derive(Debug, Clone, Default)]
pub struct SalesOverview {
    pub total_revenue: Money,
    pub total_orders: u64,
    pub orders_per_day: HashMap<String, u64>,
    pub top_products: HashMap<String, u64>,
    pub shipped_orders: u64,
    pub delivered_orders: u64,
    pub cancelled_orders: u64,
    pub daily_revenue: HashMap<String, Money>,
    pub total_visitors: u64,
}

impl SalesOverview {
    /// Fetches a fresh snapshot from the sales collaborator.
    ///
    /// Never fails: each sub-fetch degrades to its default on error.
    #[tracing::instrument(skip_all)]
    pub async fn fetch<S: SalesApi>(api: &S, session: &SessionContext) -> Self {
        fn keep<T: Default>(field: &'static str, result: Result<T, rest::RestError>) -> T {
            match result {
                Ok(value) => value,
                Err(err) => {
                    tracing::error!(error = %err, field, "sales fetch failed, using default");
                    T::default()
                }
            }
        }

        Self {
            total_revenue: keep("total_revenue", api.total_revenue(session).await),
            total_orders: keep("total_orders", api.total_orders(session).await),
            orders_per_day: keep("orders_per_day", api.orders_per_day(session).await),
            top_products: keep("top_products", api.top_products(session).await),
            shipped_orders: keep(
                "shipped_orders",
                api.orders_count(session, OrderStatus::Shipped).await,
            ),
            delivered_orders: keep(
                "delivered_orders",
                api.orders_count(session, OrderStatus::Delivered).await,
            ),
            cancelled_orders: keep(
                "cancelled_orders",
                api.orders_count(session, OrderStatus::Cancelled).await,
            ),
            daily_revenue: keep("daily_revenue", api.daily_revenue(session).await),
            total_visitors: keep("total_visitors", api.total_visitors(session).await),
        }
    }

    /// Products sorted descending by units sold.
    pub fn sorted_top_products(&self) -> Vec<(String, u64)> {
        stats::sorted_by_count(&self.top_products)
    }

    /// Orders per day in chronological order.
    pub fn sorted_orders_per_day(&self) -> Vec<(String, u64)> {
        stats::sorted_by_date(&self.orders_per_day)
    }

    /// Revenue per day in chronological order.
    pub fn sorted_daily_revenue(&self) -> Vec<(String, Money)> {
        stats::sorted_by_date(&self.daily_revenue)
    }

    /// The day with the most orders, or `None` with no data (shown "N/A").
    pub fn peak_order_day(&self) -> Option<(String, u64)> {
        stats::peak(&self.orders_per_day)
    }

    /// Mean orders per recorded day.
    pub fn average_orders_per_day(&self) -> f64 {
        stats::average(self.orders_per_day.values().map(|v| *v as f64))
    }

    /// Most orders seen in a single day, for chart scaling.
    pub fn max_orders_per_day(&self) -> u64 {
        stats::max_value(&self.orders_per_day).unwrap_or(0)
    }

    /// Mean revenue per recorded day.
    pub fn average_daily_revenue(&self) -> f64 {
        stats::average(self.daily_revenue.values().map(|m| m.as_f64()))
    }

    /// Highest single-day revenue, for chart scaling.
    pub fn max_daily_revenue(&self) -> Money {
        stats::max_value(&self.daily_revenue).unwrap_or_default()
    }

    /// Share of all orders currently shipped.
    pub fn shipped_percentage(&self) -> f64 {
        stats::percentage(self.shipped_orders, self.total_orders)
    }

    /// Share of all orders delivered.
    pub fn delivered_percentage(&self) -> f64 {
        stats::percentage(self.delivered_orders, self.total_orders)
    }

    /// Share of all orders cancelled.
    pub fn cancelled_percentage(&self) -> f64 {
        stats::percentage(self.cancelled_orders, self.total_orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::UserId;
    use rest::InMemorySalesService;

    fn session() -> SessionContext {
        SessionContext::new(UserId::new(1), "token")
    }

    fn day_map(entries: &[(&str, u64)]) -> HashMap<String, u64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[tokio::test]
    async fn test_fetch_snapshot() {
        let remote = InMemorySalesService::new();
        remote.set_totals(Money::from_cents(500_000), 20);
        remote.set_orders_per_day(day_map(&[("2026-03-01", 5), ("2026-03-02", 15)]));
        remote.set_top_products(day_map(&[("Widget", 12), ("Gadget", 30)]));
        remote.set_status_count(OrderStatus::Shipped, 5);
        remote.set_status_count(OrderStatus::Delivered, 10);
        remote.set_status_count(OrderStatus::Cancelled, 2);

        let overview = SalesOverview::fetch(&remote, &session()).await;

        assert_eq!(overview.total_revenue, Money::from_cents(500_000));
        assert_eq!(overview.total_orders, 20);
        assert_eq!(overview.sorted_top_products()[0].0, "Gadget");
        assert_eq!(
            overview.peak_order_day(),
            Some(("2026-03-02".to_string(), 15))
        );
        assert_eq!(overview.average_orders_per_day(), 10.0);
        assert_eq!(overview.max_orders_per_day(), 15);
        assert_eq!(overview.shipped_percentage(), 25.0);
        assert_eq!(overview.delivered_percentage(), 50.0);
        assert_eq!(overview.cancelled_percentage(), 10.0);
    }

    #[tokio::test]
    async fn test_fetch_degrades_to_defaults_on_failure() {
        let remote = InMemorySalesService::new();
        remote.set_totals(Money::from_cents(100), 5);
        remote.set_fail_on_fetch(true);

        let overview = SalesOverview::fetch(&remote, &session()).await;

        assert_eq!(overview.total_revenue, Money::zero());
        assert_eq!(overview.total_orders, 0);
        assert!(overview.orders_per_day.is_empty());
        assert_eq!(overview.peak_order_day(), None);
        // Division-by-zero guard: an empty dashboard is all zeros.
        assert_eq!(overview.shipped_percentage(), 0.0);
        assert_eq!(overview.average_orders_per_day(), 0.0);
    }

    #[tokio::test]
    async fn test_daily_revenue_statistics() {
        let remote = InMemorySalesService::new();
        remote.set_daily_revenue(HashMap::from([
            ("2026-03-01".to_string(), Money::from_cents(10_000)),
            ("2026-03-02".to_string(), Money::from_cents(30_000)),
        ]));

        let overview = SalesOverview::fetch(&remote, &session()).await;

        assert_eq!(overview.max_daily_revenue(), Money::from_cents(30_000));
        assert_eq!(overview.average_daily_revenue(), 20_000.0);
        assert_eq!(overview.sorted_daily_revenue()[0].0, "2026-03-01");
    }
}
