/// Error types for the chirp client
use docstore::StoreError;
use thiserror::Error;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Input rejected before any write was issued
    #[error("validation error: {0}")]
    Validation(String),

    /// Attachment upload failed; the dependent post write was not issued
    #[error("upload error: {0}")]
    Upload(String),

    /// Establishing a live subscription failed
    #[error("subscription error: {0}")]
    Subscription(String),

    /// The backing store rejected an operation
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
