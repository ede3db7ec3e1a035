use thiserror::Error;

/// Rejection reasons for a raw `game_name#tag_line` search input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidRiotId {
    #[error("a riot id needs a game name and a tagline separated by #")]
    MissingHalf,
    #[error("a riot id contains a single # separator")]
    TooManySeparators,
}

/// Failures surfaced by the backend API client.
///
/// Every variant is caught at the session boundary and converted into local
/// view state; none of them is allowed to escape as a process-level fault.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,
    #[error("HTTP status error: {0}")]
    Status(reqwest::StatusCode),
    #[error("request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("report stream error: {0}")]
    Stream(String),
}

impl ApiError {
    /// NotFound gets its own user-facing message, everything else collapses
    /// into a generic network failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }
}

/// A call to the backend either yields the success type or an [`ApiError`].
pub type ApiResponse<T> = Result<T, ApiError>;
