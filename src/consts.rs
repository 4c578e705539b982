/// Standard date format used throughout the codebase: "2025-01-15"
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp format the analytics backend expects in query parameters
pub(crate) const BACKEND_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Length of the fallback window used when today's stats look empty (inclusive of today)
pub(crate) const AGGREGATION_DAYS: u32 = 7;

/// Default look-back for category revenue
pub(crate) const CATEGORY_REVENUE_DAYS: u32 = 30;

pub(crate) const DEFAULT_BASE_URL: &str = "http://localhost:9090";

pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 10;
