//! Wire types for the analytics backend

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Paginated response envelope
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Page<T> {
    #[serde(default = "Vec::new")]
    pub(crate) content: Vec<T>,
    #[serde(default)]
    pub(crate) page_number: i64,
    #[serde(default)]
    pub(crate) page_size: i64,
    #[serde(default)]
    pub(crate) total_elements: i64,
    #[serde(default)]
    pub(crate) total_pages: i64,
    #[serde(default, alias = "last")]
    pub(crate) last_page: bool,
}

impl<T> Page<T> {
    pub(crate) fn has_next(&self) -> bool {
        !self.last_page && !self.content.is_empty() && self.page_number + 1 < self.total_pages
    }
}

/// `{ "data": ... }` wrapper used by the admin endpoints
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub(crate) data: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DashboardCounts {
    #[serde(default)]
    pub(crate) products: Option<i64>,
    #[serde(default)]
    pub(crate) categories: Option<i64>,
    #[serde(default)]
    pub(crate) orders: Option<i64>,
    #[serde(default)]
    pub(crate) users: Option<i64>,
}

/// Store-wide counts for the admin overview
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Overview {
    pub(crate) total_products: i64,
    pub(crate) total_categories: i64,
    pub(crate) total_orders: i64,
    pub(crate) total_users: i64,
}

impl From<DashboardCounts> for Overview {
    fn from(counts: DashboardCounts) -> Self {
        Overview {
            total_products: counts.products.unwrap_or(0),
            total_categories: counts.categories.unwrap_or(0),
            total_orders: counts.orders.unwrap_or(0),
            total_users: counts.users.unwrap_or(0),
        }
    }
}

/// Category ids are strings on some deployments and numbers on others
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub(crate) enum CategoryId {
    Number(i64),
    Text(String),
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryId::Number(n) => write!(f, "{n}"),
            CategoryId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Category {
    pub(crate) category_id: CategoryId,
    #[serde(default)]
    pub(crate) title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CategoryRevenue {
    pub(crate) category_id: CategoryId,
    pub(crate) title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub(crate) revenue: Decimal,
}
