/// Chirp Client Library
///
/// Client-side core of the chirp feed product: binds live, ordered
/// remote collections to locally rendered snapshots and issues the
/// writes (posts, comments, image attachments) whose effects come back
/// through those subscriptions.
///
/// # Modules
///
/// - `models`: Data structures for posts, comments and the author identity
/// - `sync`: Feed and comment synchronizers (snapshot-replace data flow)
/// - `composer`: Write path for new posts and comments
/// - `storage_key`: Collision-resistant attachment key derivation
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `logging`: Tracing subscriber setup
pub mod composer;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod storage_key;
pub mod sync;

pub use composer::{Attachment, Composer};
pub use config::Config;
pub use error::{AppError, Result};
pub use models::{Comment, Post, UserIdentity};
pub use sync::{CommentSynchronizer, FeedSynchronizer};
