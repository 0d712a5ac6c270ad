//! Error types for the background refresh.

use thiserror::Error;

/// Errors that can occur while refreshing the background image.
///
/// None of these ever reach the render tree; the refresher logs them and
/// leaves the style variable untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BackdropError {
    /// Network request failed.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("provider returned HTTP {0}")]
    Status(u16),

    /// Failed to parse the JSON response.
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// The provider returned no image URLs.
    #[error("provider returned an empty image list")]
    EmptyList,

    /// Background refresh is turned off in settings.
    #[error("background refresh is disabled")]
    Disabled,
}

impl BackdropError {
    /// Returns a user-friendly error message suitable for display in the UI.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network(_) | Self::Status(_) => "Could not reach the background image service.",
            Self::JsonParse(_) | Self::EmptyList => "The background image service sent no usable image.",
            Self::Disabled => "Background images are turned off.",
        }
    }

    /// Returns whether this error is potentially recoverable with a retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status(code) => *code == 429 || *code >= 500,
            Self::JsonParse(_) | Self::EmptyList | Self::Disabled => false,
        }
    }
}

impl From<reqwest::Error> for BackdropError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Status(status.as_u16()),
            None => Self::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for BackdropError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParse(err.to_string())
    }
}

/// Result type alias for background refresh operations.
pub type Result<T> = std::result::Result<T, BackdropError>;
