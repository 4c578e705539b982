use std::time::Duration;

use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use ureq::Body;
use ureq::http::{Response, StatusCode};

use crate::api::types::{
    Category, CategoryRevenue, DashboardCounts, Envelope, Overview, Page,
};
use crate::core::{AggregationWindow, DailyStatRecord};
use crate::error::ApiError;
use crate::utils::{backend_end_of_day, backend_start_of_day};

/// Upper bound on pages walked for one listing
const MAX_PAGES: i64 = 1_000;
const LISTING_PAGE_SIZE: i64 = 50;

/// Blocking client for the analytics backend
#[derive(Debug, Clone)]
pub(crate) struct AnalyticsClient {
    agent: ureq::Agent,
    base_url: String,
    token: Option<String>,
}

impl AnalyticsClient {
    pub(crate) fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(base_url)?;
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Ok(AnalyticsClient {
            agent,
            base_url,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the backend to (re)compute analytics
    pub(crate) fn generate(&self) -> Result<(), ApiError> {
        let path = "/analytics/generate";
        let mut request = self.agent.post(self.url(path));
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        let response = request.send_empty().map_err(|e| self.connection_error(e))?;
        check_status(path, response)?;
        Ok(())
    }

    pub(crate) fn daily(&self, date: chrono::NaiveDate) -> Result<DailyStatRecord, ApiError> {
        self.get_json(
            "/analytics/daily",
            &[("date", backend_start_of_day(date))],
        )
    }

    /// One page of per-day records, newest first
    pub(crate) fn range_page(
        &self,
        window: AggregationWindow,
        page_number: i64,
        page_size: i64,
    ) -> Result<Page<DailyStatRecord>, ApiError> {
        self.get_json(
            "/analytics/range",
            &[
                ("startDate", backend_start_of_day(window.start)),
                ("endDate", backend_end_of_day(window.end)),
                ("pageNumber", page_number.to_string()),
                ("pageSize", page_size.to_string()),
                ("sortBy", "date".to_string()),
                ("sortDir", "desc".to_string()),
            ],
        )
    }

    /// Every per-day record in `window`
    pub(crate) fn range(&self, window: AggregationWindow) -> Result<Vec<DailyStatRecord>, ApiError> {
        let page_size = window.days().clamp(1, LISTING_PAGE_SIZE);
        collect_pages(|page_number| self.range_page(window, page_number, page_size))
    }

    pub(crate) fn overview(&self) -> Result<Overview, ApiError> {
        let envelope: Envelope<DashboardCounts> = self.get_json("/admin/dashboard/stats", &[])?;
        Ok(envelope.data.unwrap_or_default().into())
    }

    pub(crate) fn categories(&self) -> Result<Vec<Category>, ApiError> {
        collect_pages(|page_number| {
            self.get_json(
                "/categories",
                &[
                    ("pageNumber", page_number.to_string()),
                    ("pageSize", LISTING_PAGE_SIZE.to_string()),
                ],
            )
        })
    }

    pub(crate) fn category_revenue(
        &self,
        category: &Category,
        window: AggregationWindow,
    ) -> Result<CategoryRevenue, ApiError> {
        let path = format!("/analytics/category/{}", category.category_id);
        let record: DailyStatRecord = self.get_json(
            &path,
            &[
                ("startDate", backend_start_of_day(window.start)),
                ("endDate", backend_end_of_day(window.end)),
            ],
        )?;
        Ok(CategoryRevenue {
            category_id: category.category_id.clone(),
            title: category.title.clone(),
            revenue: record.daily_revenue.unwrap_or(Decimal::ZERO),
        })
    }

    /// Revenue of every category over `window`, fetched in parallel, in category order
    pub(crate) fn category_revenues(
        &self,
        window: AggregationWindow,
    ) -> Result<Vec<CategoryRevenue>, ApiError> {
        let categories = self.categories()?;
        tracing::debug!(count = categories.len(), "fetching category revenue");
        categories
            .par_iter()
            .map(|category| self.category_revenue(category, window))
            .collect()
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut request = self.agent.get(self.url(path));
        for (key, value) in query {
            request = request.query(*key, value);
        }
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        tracing::debug!(path, "GET");
        let response = request.call().map_err(|e| self.connection_error(e))?;
        let response = check_status(path, response)?;
        response
            .into_body()
            .read_json::<T>()
            .map_err(|source| ApiError::Decode {
                path: path.to_string(),
                source,
            })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn connection_error(&self, source: ureq::Error) -> ApiError {
        tracing::debug!(error = %source, "transport failure");
        ApiError::Connection {
            base_url: self.base_url.clone(),
            source,
        }
    }
}

/// Walk pages from 0 until the backend reports the last one
fn collect_pages<T, F>(mut fetch: F) -> Result<Vec<T>, ApiError>
where
    F: FnMut(i64) -> Result<Page<T>, ApiError>,
{
    let mut items = Vec::new();
    let mut page_number = 0;
    loop {
        let page = fetch(page_number)?;
        tracing::trace!(
            page = page.page_number,
            size = page.page_size,
            total = page.total_elements,
            "received page"
        );
        let more = page.has_next();
        items.extend(page.content);
        page_number += 1;
        if !more || page_number >= MAX_PAGES {
            break;
        }
    }
    Ok(items)
}

fn check_status(path: &str, response: Response<Body>) -> Result<Response<Body>, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .into_body()
        .read_to_string()
        .unwrap_or_default();
    Err(classify_status(path, status.as_u16(), &body))
}

/// Map a non-success HTTP status to the error the user sees
pub(crate) fn classify_status(path: &str, status: u16, body: &str) -> ApiError {
    match status {
        404 => ApiError::NotFound {
            path: path.to_string(),
        },
        401 | 403 => ApiError::Forbidden {
            path: path.to_string(),
            status,
        },
        _ => ApiError::Status {
            path: path.to_string(),
            status,
            message: error_message(status, body),
        },
    }
}

fn error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body)
        && let Some(message) = value.get("message").and_then(|m| m.as_str())
        && !message.trim().is_empty()
    {
        return message.trim().to_string();
    }
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Failed to fetch statistics")
        .to_string()
}

pub(crate) fn normalize_base_url(input: &str) -> Result<String, ApiError> {
    let trimmed = input.trim().trim_end_matches('/');
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let has_host = trimmed
        .split_once("://")
        .is_some_and(|(_, rest)| !rest.is_empty());
    if !has_scheme || !has_host {
        return Err(ApiError::InvalidBaseUrl {
            input: input.to_string(),
        });
    }
    Ok(trimmed.to_string())
}
