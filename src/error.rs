use thiserror::Error;

/// Error type for Snooth API operations.
///
/// - `Validation` — rejected client-side before any request was sent
/// - `TypeValidation` — the service reported a non-numeric price filter
/// - `Authentication` — the service rejected the API key
/// - `ValueValidation` — the service rejected the location identifier
/// - `BadQueryParams` — HTTP 500, which the service uses for malformed input
/// - `Http` — any other non-2xx status code
/// - `Timeout` — the request exceeded its deadline
/// - `RequestFailed` — other network/transport errors (wraps `reqwest::Error`)
/// - `Schema` — the response envelope did not have the expected shape
/// - `Client` — any other error message reported in the envelope
/// - `Config` — an environment variable held an unusable value
#[derive(Debug, Error)]
pub enum SnoothError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Type validation error: {message}")]
    TypeValidation { message: String },

    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Value validation error: {message}")]
    ValueValidation { message: String },

    #[error("500 Bad query params")]
    BadQueryParams,

    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Unknown error has occured: {message}")]
    Schema { message: String },

    #[error("Client error: {message}")]
    Client { message: String },

    #[error("Invalid value for {var}: {reason}")]
    Config { var: String, reason: String },
}

impl SnoothError {
    /// True for every error raised because the query itself was rejected,
    /// whether locally or by the service.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SnoothError::Validation { .. }
                | SnoothError::TypeValidation { .. }
                | SnoothError::ValueValidation { .. }
                | SnoothError::Authentication { .. }
        )
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        SnoothError::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn schema(message: impl Into<String>) -> Self {
        SnoothError::Schema {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SnoothError>;
