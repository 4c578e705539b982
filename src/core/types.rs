//! Core analytics types
//!
//! `DailyStatRecord` is what the backend sends (every number may be missing),
//! `DailyStat` is the normalized form all other code works with.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::parse_wire_date;

/// One calendar day's order/revenue summary, as returned by the backend
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DailyStatRecord {
    #[serde(default)]
    pub(crate) date: Option<String>,
    #[serde(default)]
    pub(crate) daily_revenue: Option<Decimal>,
    #[serde(default)]
    pub(crate) total_orders: Option<i64>,
    #[serde(default)]
    pub(crate) completed_orders: Option<i64>,
    #[serde(default)]
    pub(crate) cancelled_orders: Option<i64>,
    #[serde(default)]
    pub(crate) average_order_value: Option<Decimal>,
    #[serde(default)]
    pub(crate) total_products: Option<i64>,
    #[serde(default)]
    pub(crate) total_customers: Option<i64>,
}

impl DailyStatRecord {
    /// Substitute zero for every missing numeric field.
    ///
    /// Values are otherwise passed through untouched, including negative
    /// numbers from malformed upstream data. `fallback_date` is used when the
    /// record carries no parsable date.
    pub(crate) fn normalize(self, fallback_date: NaiveDate) -> DailyStat {
        DailyStat {
            date: self
                .date
                .as_deref()
                .and_then(parse_wire_date)
                .unwrap_or(fallback_date),
            daily_revenue: self.daily_revenue.unwrap_or(Decimal::ZERO),
            total_orders: self.total_orders.unwrap_or(0),
            completed_orders: self.completed_orders.unwrap_or(0),
            cancelled_orders: self.cancelled_orders.unwrap_or(0),
            average_order_value: self.average_order_value.unwrap_or(Decimal::ZERO),
            total_products: self.total_products.unwrap_or(0),
            total_customers: self.total_customers.unwrap_or(0),
        }
    }
}

/// Normalized daily statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DailyStat {
    pub(crate) date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub(crate) daily_revenue: Decimal,
    pub(crate) total_orders: i64,
    pub(crate) completed_orders: i64,
    pub(crate) cancelled_orders: i64,
    /// Server-supplied for a single day, derived for aggregates
    #[serde(with = "rust_decimal::serde::float")]
    pub(crate) average_order_value: Decimal,
    /// Catalog-wide snapshot, not a per-day flow
    pub(crate) total_products: i64,
    /// Customer-base snapshot, not a per-day flow
    pub(crate) total_customers: i64,
}

impl DailyStat {
    pub(crate) fn zeroed(date: NaiveDate) -> Self {
        DailyStat {
            date,
            daily_revenue: Decimal::ZERO,
            total_orders: 0,
            completed_orders: 0,
            cancelled_orders: 0,
            average_order_value: Decimal::ZERO,
            total_products: 0,
            total_customers: 0,
        }
    }

    /// Whether the record shows any sales activity.
    ///
    /// `cancelled_orders` is not consulted: a day with only cancellations
    /// counts as empty.
    pub(crate) fn has_sales(&self) -> bool {
        self.daily_revenue > Decimal::ZERO || self.total_orders > 0 || self.completed_orders > 0
    }
}

/// Where a reconciled stat came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum StatSource {
    /// Today's own record
    Today,
    /// Rollup of the trailing aggregation window
    AggregatedRange,
    /// No data anywhere in the window
    Empty,
}

impl StatSource {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            StatSource::Today => "today",
            StatSource::AggregatedRange => "aggregated-range",
            StatSource::Empty => "empty",
        }
    }

    /// Informational line for the user, if any
    pub(crate) fn message(self) -> Option<&'static str> {
        match self {
            StatSource::Today => None,
            StatSource::AggregatedRange => Some("Showing aggregated data from the last 7 days"),
            StatSource::Empty => Some("No sales data found for the selected period"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ReconciliationResult {
    pub(crate) source: StatSource,
    pub(crate) stat: DailyStat,
}

/// Inclusive date span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AggregationWindow {
    pub(crate) start: NaiveDate,
    pub(crate) end: NaiveDate,
}

impl AggregationWindow {
    /// `days` calendar days ending at (and including) `end`
    pub(crate) fn trailing(end: NaiveDate, days: u32) -> Self {
        let back = u64::from(days.saturating_sub(1));
        let start = end.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN);
        AggregationWindow { start, end }
    }

    pub(crate) fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}
