//! Folding a run of daily stats into one record

use rust_decimal::Decimal;

use crate::core::types::DailyStat;

/// Running totals over a sequence of days
#[derive(Debug, Default, Clone)]
struct Accumulator {
    daily_revenue: Decimal,
    total_orders: i64,
    completed_orders: i64,
    cancelled_orders: i64,
    total_products: i64,
    total_customers: i64,
}

impl Accumulator {
    fn add(&mut self, day: &DailyStat) {
        // Upstream values are unchecked; clamp instead of overflowing
        self.daily_revenue = self.daily_revenue.saturating_add(day.daily_revenue);
        self.total_orders = self.total_orders.saturating_add(day.total_orders);
        self.completed_orders = self.completed_orders.saturating_add(day.completed_orders);
        self.cancelled_orders = self.cancelled_orders.saturating_add(day.cancelled_orders);
        // Snapshots: summing would count the same products/customers once per day
        self.total_products = self.total_products.max(day.total_products);
        self.total_customers = self.total_customers.max(day.total_customers);
    }

    fn into_stat(self, date: chrono::NaiveDate) -> DailyStat {
        DailyStat {
            date,
            average_order_value: average_order_value(self.daily_revenue, self.total_orders),
            daily_revenue: self.daily_revenue,
            total_orders: self.total_orders,
            completed_orders: self.completed_orders,
            cancelled_orders: self.cancelled_orders,
            total_products: self.total_products,
            total_customers: self.total_customers,
        }
    }
}

/// Revenue per order, zero when there are no orders
pub(crate) fn average_order_value(revenue: Decimal, orders: i64) -> Decimal {
    if orders <= 0 {
        return Decimal::ZERO;
    }
    revenue
        .checked_div(Decimal::from(orders))
        .unwrap_or(Decimal::ZERO)
}

/// Sum flow fields, take the max of snapshot fields and derive the average.
///
/// The result is dated `date`; input order does not matter.
pub(crate) fn aggregate_days<'a, I>(days: I, date: chrono::NaiveDate) -> DailyStat
where
    I: IntoIterator<Item = &'a DailyStat>,
{
    let mut acc = Accumulator::default();
    for day in days {
        acc.add(day);
    }
    acc.into_stat(date)
}
