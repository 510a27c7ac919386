use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("{0}")]
    Input(#[from] InputError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Discarded stale {operation} response: data was cleared while the request was in flight")]
    Stale { operation: &'static str },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Input errors rejected before any network call is made
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("No test cases available: {operation} requires at least one test case")]
    NoTestCases { operation: &'static str },

    #[error("Nothing to export: no data has been ingested or generated yet")]
    NothingToExport,

    #[error("Failed to read {path}: {message}")]
    FileRead { path: String, message: String },

    #[error("Invalid test case file: {message}")]
    TestCaseFile { message: String },
}

/// Remote service errors
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl AppError {
    /// Whether this error was rejected client-side, before any network call.
    pub fn is_input(&self) -> bool {
        matches!(self, AppError::Input(_))
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for remote service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
