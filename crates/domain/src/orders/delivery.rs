//! Delivery-date arithmetic for order display.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use common::OrderStatus;
use rest::OrderRecord;

/// Calendar days between placement and estimated delivery.
pub const DELIVERY_WINDOW_DAYS: i64 = 7;

/// Estimated delivery date: order date plus the delivery window.
pub fn estimated_delivery(order_date: DateTime<Utc>) -> NaiveDate {
    (order_date + Duration::days(DELIVERY_WINDOW_DAYS)).date_naive()
}

/// The delivery date shown for an order.
///
/// A returned order shows the date of the return action (today) instead of
/// the original estimate.
pub fn displayed_delivery_date(order: &OrderRecord, today: NaiveDate) -> NaiveDate {
    if order.order_status == OrderStatus::Returned {
        today
    } else {
        estimated_delivery(order.order_date)
    }
}

/// Formats a delivery date for display, e.g. `05 Aug 2026`.
pub fn format_delivery_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

/// Where an order stands relative to its delivery estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryCountdown {
    Delivered,
    Cancelled,
    Returned,
    Overdue,
    Today,
    Tomorrow,
    InDays(i64),
}

/// Computes the countdown state against an injected `today`.
///
/// Terminal orders report their status; everything else compares the
/// estimate to today.
pub fn delivery_countdown(order: &OrderRecord, today: NaiveDate) -> DeliveryCountdown {
    match order.order_status {
        OrderStatus::Delivered => DeliveryCountdown::Delivered,
        OrderStatus::Cancelled => DeliveryCountdown::Cancelled,
        OrderStatus::Returned => DeliveryCountdown::Returned,
        _ => {
            let due = estimated_delivery(order.order_date);
            match (due - today).num_days() {
                days if days < 0 => DeliveryCountdown::Overdue,
                0 => DeliveryCountdown::Today,
                1 => DeliveryCountdown::Tomorrow,
                days => DeliveryCountdown::InDays(days),
            }
        }
    }
}

impl std::fmt::Display for DeliveryCountdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryCountdown::Delivered => write!(f, "Delivered"),
            DeliveryCountdown::Cancelled => write!(f, "Cancelled"),
            DeliveryCountdown::Returned => write!(f, "Returned"),
            DeliveryCountdown::Overdue => write!(f, "Overdue"),
            DeliveryCountdown::Today => write!(f, "Delivering Today"),
            DeliveryCountdown::Tomorrow => write!(f, "Delivering Tomorrow"),
            DeliveryCountdown::InDays(days) => write!(f, "{days} days to delivery"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use common::{AddressId, OrderId, PaymentOption, PaymentStatus, UserId};

    fn order_placed_on(date: DateTime<Utc>, status: OrderStatus) -> OrderRecord {
        OrderRecord {
            order_id: OrderId::new(1),
            user_id: UserId::new(1),
            address_id: AddressId::new(1),
            products: vec![],
            order_status: status,
            payment_status: PaymentStatus::Pending,
            payment_option: PaymentOption::CashOnDelivery,
            order_date: date,
        }
    }

    fn march_first() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_estimate_is_a_week_after_placement() {
        assert_eq!(
            estimated_delivery(march_first()),
            NaiveDate::from_ymd_opt(2026, 3, 8).unwrap()
        );
    }

    #[test]
    fn test_returned_order_shows_return_date() {
        let order = order_placed_on(march_first(), OrderStatus::Returned);
        let today = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();
        assert_eq!(displayed_delivery_date(&order, today), today);
    }

    #[test]
    fn test_active_order_shows_estimate() {
        let order = order_placed_on(march_first(), OrderStatus::Shipped);
        let today = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();
        assert_eq!(
            displayed_delivery_date(&order, today),
            NaiveDate::from_ymd_opt(2026, 3, 8).unwrap()
        );
    }

    #[test]
    fn test_format() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        assert_eq!(format_delivery_date(date), "05 Aug 2026");
    }

    #[test]
    fn test_countdown_states() {
        let order = order_placed_on(march_first(), OrderStatus::Pending);
        let due = NaiveDate::from_ymd_opt(2026, 3, 8).unwrap();

        assert_eq!(delivery_countdown(&order, due), DeliveryCountdown::Today);
        assert_eq!(
            delivery_countdown(&order, due - Duration::days(1)),
            DeliveryCountdown::Tomorrow
        );
        assert_eq!(
            delivery_countdown(&order, due - Duration::days(3)),
            DeliveryCountdown::InDays(3)
        );
        assert_eq!(
            delivery_countdown(&order, due + Duration::days(1)),
            DeliveryCountdown::Overdue
        );
    }

    #[test]
    fn test_countdown_terminal_states_win() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        for (status, expected) in [
            (OrderStatus::Delivered, DeliveryCountdown::Delivered),
            (OrderStatus::Cancelled, DeliveryCountdown::Cancelled),
            (OrderStatus::Returned, DeliveryCountdown::Returned),
        ] {
            let order = order_placed_on(march_first(), status);
            assert_eq!(delivery_countdown(&order, today), expected);
        }
    }

    #[test]
    fn test_countdown_display() {
        assert_eq!(DeliveryCountdown::Today.to_string(), "Delivering Today");
        assert_eq!(DeliveryCountdown::InDays(4).to_string(), "4 days to delivery");
    }
}
