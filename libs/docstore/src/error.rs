/// Error types for the document store boundary
use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by `DocumentStore` and `BlobStore` implementations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The subscription was cancelled or its sender side went away
    #[error("subscription closed")]
    SubscriptionClosed,

    /// A blob or document lookup missed
    #[error("not found: {0}")]
    NotFound(String),

    /// The requested order key is not served by this backend
    #[error("unsupported order field: {0}")]
    UnsupportedOrder(String),

    /// Backend-specific failure
    #[error("backend error: {0}")]
    Backend(String),
}
