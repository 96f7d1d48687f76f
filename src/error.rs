//! The error type shared by every module of this crate

use thiserror::Error;

/// Everything that can go wrong when talking to the server or mutating the local index.
///
/// Remote failures are deliberately coarse: the server does not document its error codes, so a failed request only carries the name of the operation that failed (the transport-level cause is logged, not surfaced).
#[derive(Debug, Error)]
pub enum Error {
    /// The server returned a non-success status, or the request could not be sent at all
    #[error("the {operation} request failed")]
    RequestFailed { operation: &'static str },

    /// The base URL this client was created with is not a valid URL
    #[error("invalid API base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// No task with this id is filed under this day
    #[error("no task {id} on {date_key}")]
    UnknownTask { date_key: String, id: String },

    /// A time-of-day string that is not `HH:MM`
    #[error("invalid time of day {0:?} (expected HH:MM)")]
    InvalidTime(String),

    /// A date key that does not designate a calendar day
    #[error("invalid date key {0:?}")]
    InvalidDateKey(String),

    /// A search that matched nothing (or an empty keyword)
    #[error("no task matches {keyword:?}")]
    NoMatch { keyword: String },
}

impl Error {
    pub(crate) fn request_failed(operation: &'static str) -> Self {
        Error::RequestFailed { operation }
    }
}
