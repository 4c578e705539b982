//! Today-or-fallback reconciliation
//!
//! Today's record is trusted when it shows sales. Otherwise the trailing
//! window is fetched once and rolled up; an empty window is reported as
//! `StatSource::Empty`, which is a normal outcome rather than an error.

use chrono::NaiveDate;

use crate::consts::AGGREGATION_DAYS;
use crate::core::aggregator::aggregate_days;
use crate::core::types::{AggregationWindow, DailyStat, ReconciliationResult, StatSource};
use crate::error::ReconcileError;

/// Capability to load the daily records of an inclusive date range
pub(crate) trait RangeFetcher {
    type Error;

    fn fetch_range(&mut self, window: AggregationWindow) -> Result<Vec<DailyStat>, Self::Error>;
}

impl<F, E> RangeFetcher for F
where
    F: FnMut(NaiveDate, NaiveDate) -> Result<Vec<DailyStat>, E>,
{
    type Error = E;

    fn fetch_range(&mut self, window: AggregationWindow) -> Result<Vec<DailyStat>, E> {
        self(window.start, window.end)
    }
}

pub(crate) fn reconcile<F>(
    today: DailyStat,
    mut fetcher: F,
) -> Result<ReconciliationResult, ReconcileError<F::Error>>
where
    F: RangeFetcher,
{
    if today.has_sales() {
        return Ok(ReconciliationResult {
            source: StatSource::Today,
            stat: today,
        });
    }

    let window = AggregationWindow::trailing(today.date, AGGREGATION_DAYS);
    tracing::debug!(
        start = %window.start,
        end = %window.end,
        "today has no sales, aggregating trailing window"
    );

    let days = fetcher
        .fetch_range(window)
        .map_err(ReconcileError::UpstreamUnavailable)?;

    if days.is_empty() {
        return Ok(ReconciliationResult {
            source: StatSource::Empty,
            stat: DailyStat::zeroed(today.date),
        });
    }

    tracing::debug!(days = days.len(), "aggregating fallback records");
    Ok(ReconciliationResult {
        source: StatSource::AggregatedRange,
        stat: aggregate_days(&days, today.date),
    })
}
