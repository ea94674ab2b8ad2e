use thiserror::Error;

/// Errors that can occur while talking to the cocktail service or driving the views
#[derive(Error, Debug)]
pub enum CocktailError {
    /// Transport-level failure (connection, TLS, body decoding)
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status
    #[error("{endpoint} returned HTTP {status}")]
    Status { status: u16, endpoint: String },

    /// The response body did not have the expected `{ "drinks": ... }` shape
    #[error("Unexpected response payload: {0}")]
    MalformedPayload(String),

    /// Lookup by identifier returned no recipe
    #[error("Cocktail not found: {0}")]
    NotFound(String),

    /// Failed to (de)serialize JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local cache file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A location string that maps to no known route
    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    /// A filter value outside the accepted vocabulary
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// A terminal command that could not be understood
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}
