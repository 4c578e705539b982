//! Core module - analytics types and reconciliation logic

mod aggregator;
mod reconcile;
mod refresh;
mod types;

pub(crate) use aggregator::aggregate_days;
pub(crate) use reconcile::reconcile;
pub(crate) use refresh::{RefreshGate, Ticket};
pub(crate) use types::{AggregationWindow, DailyStat, DailyStatRecord, ReconciliationResult, StatSource};
