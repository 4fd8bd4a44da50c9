//! Error types shared across the client core.
//!
//! Every failure class that can reach a screen is a variant here so call
//! sites can decide between showing a toast, clearing the session, or
//! keeping a form open. Nothing in this taxonomy is fatal to the process.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The auth service reported its database is down. Shown with a
    /// specific remediation message rather than "invalid credentials".
    #[error("The service is temporarily unavailable. Please try again in a few minutes.")]
    DatabaseUnavailable,

    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Client-side validation failed before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// A 401 response: the session has been cleared and the user must
    /// log in again.
    #[error("Your session has expired. Please log in again.")]
    SessionExpired,

    /// A 403 response: logged for developers, never shown to the user.
    #[error("Access denied")]
    Forbidden,

    #[error("The request timed out. Please check your connection and try again.")]
    Timeout,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
