use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid date \"{input}\" (expected YYYYMMDD or YYYY-MM-DD)")]
    InvalidDate { input: String },

    #[error("Invalid timezone: {input}")]
    InvalidTimezone { input: String },

    #[error("Unsupported locale: {input}")]
    UnsupportedLocale { input: String },

    #[error("Invalid range: {since} is after {until}")]
    InvalidRange { since: String, until: String },

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("{0}")]
    Reconcile(#[from] ReconcileError<ApiError>),
}

/// Failures talking to the analytics backend
#[derive(Debug, Error)]
pub(crate) enum ApiError {
    #[error("No analytics data found at {path}. Please try again later.")]
    NotFound { path: String },

    #[error("You do not have permission to access {path} (HTTP {status})")]
    Forbidden { path: String, status: u16 },

    #[error("Request to {path} failed with HTTP {status}: {message}")]
    Status {
        path: String,
        status: u16,
        message: String,
    },

    #[error("Cannot connect to the server at {base_url}. Please check your connection.")]
    Connection {
        base_url: String,
        #[source]
        source: ureq::Error,
    },

    #[error("Invalid response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: ureq::Error,
    },

    #[error("Invalid base URL \"{input}\" (expected http:// or https://)")]
    InvalidBaseUrl { input: String },
}

/// Reconciliation failed because the range fetch did
#[derive(Debug, Error)]
pub(crate) enum ReconcileError<E> {
    #[error("Analytics range unavailable: {0}")]
    UpstreamUnavailable(#[source] E),
}

#[cfg(test)]
impl<E> ReconcileError<E> {
    /// The fetch error exactly as the fetcher returned it
    pub(crate) fn into_upstream(self) -> E {
        match self {
            ReconcileError::UpstreamUnavailable(e) => e,
        }
    }
}
