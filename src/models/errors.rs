use thiserror::Error;

/// Service-level errors that can occur in business logic
///
/// No variant is fatal: every failure path leaves the caller in an
/// editable state.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Please select at least one service")]
    EmptySelection,

    #[error("Service not found in cart: {id}")]
    ItemNotFound { id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Payment failed: {message}")]
    PaymentRejected { message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Storage error: {source}")]
    Storage {
        #[from]
        source: StorageError,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Storage-level errors for persisted client state
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("Invalid stored record for key {key}: {message}")]
    InvalidRecord { key: String, message: String },
}

/// Validation errors for user-supplied input
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredField { field: String },

    #[error("Invalid field value: {field}={value}, reason={reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Value out of range: {field}, min={min}, value={value}")]
    OutOfRange {
        field: String,
        min: String,
        value: String,
    },
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Validation {
            message: err.to_string(),
        }
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;
