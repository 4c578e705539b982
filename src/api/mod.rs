//! HTTP access to the shop's analytics backend

mod client;
mod types;

pub(crate) use client::AnalyticsClient;
pub(crate) use types::{CategoryRevenue, Overview};
#[cfg(test)]
pub(crate) use types::CategoryId;
