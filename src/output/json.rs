use serde::Serialize;

use crate::cli::SortOrder;
use crate::core::{DailyStat, ReconciliationResult, StatSource};
use crate::output::format::to_pretty_json;
use crate::output::table::sorted_days;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TodayJson<'a> {
    source: StatSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refreshed_at: Option<&'a str>,
    stat: &'a DailyStat,
}

/// Reconciled stats plus their provenance tag
pub(crate) fn output_today_json(result: &ReconciliationResult, refreshed_at: Option<&str>) -> String {
    let output = TodayJson {
        source: result.source,
        message: result.source.message(),
        refreshed_at,
        stat: &result.stat,
    };
    to_pretty_json(&output, "{}")
}

#[derive(Serialize)]
struct RangeJson<'a> {
    days: Vec<&'a DailyStat>,
    total: &'a DailyStat,
}

pub(crate) fn output_range_json(days: &[DailyStat], total: &DailyStat, order: SortOrder) -> String {
    let output = RangeJson {
        days: sorted_days(days, order),
        total,
    };
    to_pretty_json(&output, "{}")
}
