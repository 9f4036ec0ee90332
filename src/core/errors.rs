use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("API error: {code} - {message}")]
    ApiError { code: i32, message: String },

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),

    /// Credential material that cannot be decoded (e.g. a secret that is not Base64)
    #[error("Decoding error: {0}")]
    DecodingError(String),

    /// A response that does not have the shape the exchange documents
    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl ExchangeError {
    /// Build a schema error for a field that is missing or has the wrong type
    pub(crate) fn schema(context: &str, err: impl std::fmt::Display) -> Self {
        Self::SchemaError(format!("{}: {}", context, err))
    }
}
