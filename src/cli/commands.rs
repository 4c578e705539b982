//! CLI subcommand definitions

use clap::{Args, Subcommand};

use crate::consts::CATEGORY_REVENUE_DAYS;

/// Main CLI commands
#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Show today's sales, or the last 7 days when today has none (default)
    Today(TodayArgs),
    /// Show per-day sales for a date range
    Range(RangeArgs),
    /// Show store-wide product, category, order and user counts
    Overview,
    /// Show revenue per category
    Categories(CategoriesArgs),
    /// Ask the backend to regenerate analytics
    Generate,
}

#[derive(Debug, Clone, Default, Args)]
pub(crate) struct TodayArgs {
    /// Do not trigger analytics generation first
    #[arg(long)]
    pub(crate) no_generate: bool,

    /// Refresh every SECS seconds (press Enter to refresh immediately)
    #[arg(short, long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub(crate) watch: Option<u64>,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct RangeArgs {
    /// First day (YYYYMMDD or YYYY-MM-DD), default 6 days before --until
    #[arg(short, long)]
    pub(crate) since: Option<String>,

    /// Last day (YYYYMMDD or YYYY-MM-DD), default today
    #[arg(short, long)]
    pub(crate) until: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct CategoriesArgs {
    /// Number of days to look back
    #[arg(long, default_value_t = CATEGORY_REVENUE_DAYS, value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) days: u32,
}
