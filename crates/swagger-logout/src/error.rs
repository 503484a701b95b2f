use thiserror::Error;

/// Failures raised by the browser adapters.
///
/// None of these reach the user: the locator turns them into "not found",
/// the clearer logs them, and the click always ends in a navigation unless
/// the page location itself is unusable.
#[derive(Debug, Error)]
pub enum LogoutError {
    #[error("Storage access failed: {0}")]
    Storage(String),

    #[error("Swagger UI call failed: {0}")]
    AuthUi(String),

    #[error("Page location unavailable: {0}")]
    Location(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("DOM operation failed: {0}")]
    Dom(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
