/// Document store seams for the chirp client
///
/// This crate defines the backend boundary the client crates program
/// against, plus an in-memory reference backend used by tests and the
/// demo binary.
///
/// # Modules
///
/// - `collection`: Collection paths, documents, snapshots, ordering
/// - `store`: The `DocumentStore` and `BlobStore` traits and the
///   `Subscription` handed out by `subscribe`
/// - `memory`: In-memory backend implementing both traits
/// - `error`: Error types and handling
pub mod collection;
pub mod error;
pub mod memory;
pub mod store;

pub use collection::{CollectionPath, Direction, Document, OrderBy, Snapshot};
pub use error::{Result, StoreError};
pub use memory::{MemoryBlobStore, MemoryStore};
pub use store::{BlobStore, CancelHandle, DocumentStore, Subscription};
