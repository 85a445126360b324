//! Error types for the Searchlight library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`SearchlightError`] enum. Configuration errors surface when a required
//! setting is dereferenced, validation errors when a query is constructed,
//! and backend errors are passed through from the driver unchanged.
//!
//! # Examples
//!
//! ```
//! use searchlight::error::{Result, SearchlightError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SearchlightError::invalid_range("no bounds given for field 'age'"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Searchlight operations.
#[derive(Error, Debug)]
pub enum SearchlightError {
    /// I/O errors (config files, document files, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The requested driver is not configured.
    #[error("Driver not set: {0}")]
    DriverNotSet(String),

    /// No indexable model is registered for a category.
    #[error("Indexable model not set: {0}")]
    IndexableModelNotSet(String),

    /// A range query was built without any bound.
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Query construction errors (bad patterns, unsupported parameters, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// The target document does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transport failures and malformed backend responses.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Invalid configuration values.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Indexing channel errors.
    #[error("Channel error: {0}")]
    Channel(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Errors raised by injected search clients
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with SearchlightError.
pub type Result<T> = std::result::Result<T, SearchlightError>;

impl SearchlightError {
    /// Create a new driver-not-set error.
    pub fn driver_not_set<S: Into<String>>(msg: S) -> Self {
        SearchlightError::DriverNotSet(msg.into())
    }

    /// Create a new indexable-model-not-set error.
    pub fn indexable_model_not_set<S: Into<String>>(msg: S) -> Self {
        SearchlightError::IndexableModelNotSet(msg.into())
    }

    /// Create a new invalid range error.
    pub fn invalid_range<S: Into<String>>(msg: S) -> Self {
        SearchlightError::InvalidRange(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        SearchlightError::Query(msg.into())
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        SearchlightError::NotFound(msg.into())
    }

    /// Create a new backend error.
    pub fn backend<S: Into<String>>(msg: S) -> Self {
        SearchlightError::Backend(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SearchlightError::Config(msg.into())
    }

    /// Create a new channel error.
    pub fn channel<S: Into<String>>(msg: S) -> Self {
        SearchlightError::Channel(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SearchlightError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SearchlightError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Whether this error is a missing-document error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SearchlightError::NotFound(_))
    }

    /// Whether this error comes from configuration (never worth retrying).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SearchlightError::DriverNotSet(_)
                | SearchlightError::IndexableModelNotSet(_)
                | SearchlightError::Config(_)
        )
    }

    /// Whether this error was raised while validating a query.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SearchlightError::InvalidRange(_) | SearchlightError::Query(_)
        )
    }
}
