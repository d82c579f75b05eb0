//! Error types for `bridge-swagger-tools`.

use thiserror::Error;

/// Main error type for Swagger bridge tooling.
#[derive(Error, Debug)]
pub enum SwaggerToolsError {
    /// Configuration errors (missing base URL, duplicate tool names, empty spec).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Runtime errors (unknown tool, invalid arguments).
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Tool call deadline exceeded.
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Swagger errors (spec validation, unsupported constructs).
    #[error("Swagger error: {0}")]
    Swagger(String),

    #[error("Swagger error: failed to fetch spec from '{url}': {message}")]
    SpecFetch { url: String, message: String },

    #[error("Swagger error: failed to read spec body from '{url}': {message}")]
    SpecReadBody { url: String, message: String },

    #[error("Swagger error: failed to read spec file '{path}': {source}")]
    SpecReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Swagger error: failed to parse spec from '{location}': {source}")]
    SpecParse {
        location: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Outbound HTTP transport errors.
    #[error("Request error: {0}")]
    Request(String),
}

/// Result type alias for Swagger bridge operations.
pub type Result<T> = std::result::Result<T, SwaggerToolsError>;
