/// Data models for the chirp client
///
/// Posts and comments are append-only: created by the composer, never
/// mutated, identified and timestamped by the backing store. Decoding
/// from stored documents is lenient; fields absent on a record read as
/// empty rather than failing the whole snapshot.
use chrono::{DateTime, Local, Utc};
use docstore::Document;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated identity consumed by the composer. Produced by the
/// external identity provider; this crate only carries the value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserIdentity {
    pub display_name: String,
    pub photo_url: String,
}

/// One entry in the feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: Uuid,
    pub username: String,
    pub avatar: String,
    pub text: String,
    /// Attachment retrieval URL; the empty string when the post has no
    /// attachment
    pub image: String,
    pub created_at: DateTime<Utc>,
}

/// One entry in a post's comment thread
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub id: Uuid,
    pub username: String,
    pub avatar: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Typed decode from a stored document
pub trait FromDocument: Sized {
    fn from_document(doc: &Document) -> Self;
}

impl FromDocument for Post {
    fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id,
            username: doc.str_field("username"),
            avatar: doc.str_field("avatar"),
            text: doc.str_field("text"),
            image: doc.str_field("image"),
            created_at: doc.created_at,
        }
    }
}

impl FromDocument for Comment {
    fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id,
            username: doc.str_field("username"),
            avatar: doc.str_field("avatar"),
            text: doc.str_field("text"),
            created_at: doc.created_at,
        }
    }
}

/// Server timestamp rendered in the viewer's local time, for list rows
pub fn humanize_timestamp(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
