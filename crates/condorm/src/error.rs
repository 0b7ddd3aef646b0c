//! Error types for condorm

use thiserror::Error;

/// Boxed error returned by a [`Driver`](crate::driver::Driver).
pub type DriverError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for condorm operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for query building, compilation, execution and mapping
#[derive(Debug, Error)]
pub enum OrmError {
    /// Malformed modifier: negative limit/offset, empty IN list, wrong arity
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The dialect cannot express the requested construct
    #[error("Unsupported modifier: {0}")]
    UnsupportedModifier(String),

    /// A returned value could not be stored in the destination field
    #[error("Conversion error on column '{column}': {message}")]
    Conversion { column: String, message: String },

    /// The driver failed to run the query
    #[error("Execution error: {0}")]
    Execution(#[source] DriverError),
}

impl OrmError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an unsupported modifier error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedModifier(message.into())
    }

    /// Create a conversion error for a specific column
    pub fn conversion(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conversion {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Wrap a driver failure verbatim
    pub fn execution(err: impl Into<DriverError>) -> Self {
        Self::Execution(err.into())
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Check if this is an unsupported modifier error
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedModifier(_))
    }

    /// Check if this is a conversion error
    pub fn is_conversion(&self) -> bool {
        matches!(self, Self::Conversion { .. })
    }

    /// Check if this is an execution error
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for OrmError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Execution(Box::new(err))
    }
}
