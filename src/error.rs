use thiserror::Error;

/// Error type for storage access operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid decimal value in row: {0}")]
    Decimal(#[from] rust_decimal::Error),

    #[error("Transaction already committed or rolled back")]
    TransactionClosed,
}

/// Result type for storage access operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type exposed by the payment service to the transport layer.
///
/// `ResourceNotFound` maps to a "not found" response, `Validation` to a
/// "bad request" response. `Store` carries any storage failure unchanged;
/// the service performs no retries of its own.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Requested {resource} with id {id} was not found")]
    ResourceNotFound { resource: &'static str, id: i64 },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
