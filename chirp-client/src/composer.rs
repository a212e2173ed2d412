/// Composer - the write path for posts and comments
///
/// Writes are fire-and-forget with respect to the UI: the returned id is
/// informational and visible state updates arrive through the
/// synchronizers' next notification. Errors surface synchronously to the
/// caller and are not retried.
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::UserIdentity;
use crate::storage_key;
use bytes::Bytes;
use docstore::{BlobStore, CollectionPath, DocumentStore};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use uuid::Uuid;

/// Binary image attachment for a new post
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Bytes,
}

pub struct Composer {
    store: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    posts_collection: String,
    comments_collection: String,
    upload_prefix: String,
}

impl Composer {
    pub fn new(store: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>, config: &Config) -> Self {
        Self {
            store,
            blobs,
            posts_collection: config.store.posts_collection.clone(),
            comments_collection: config.store.comments_collection.clone(),
            upload_prefix: config.storage.upload_prefix.clone(),
        }
    }

    /// Submit a new post, uploading the attachment first when present
    ///
    /// The attachment must be durably stored before the post record is
    /// written, so a failed upload never leaves a record pointing at a
    /// missing blob. A failed record write after a successful upload is
    /// reported to the caller; the uploaded blob stays behind.
    pub async fn submit_post(
        &self,
        author: &UserIdentity,
        text: &str,
        attachment: Option<Attachment>,
    ) -> Result<Uuid> {
        if text.trim().is_empty() {
            return Err(AppError::Validation("post text must not be empty".to_string()));
        }

        let image = match attachment {
            Some(attachment) => self.upload_attachment(attachment).await?,
            None => String::new(),
        };

        let path = CollectionPath::root(&self.posts_collection);
        let id = match self.store.append(&path, post_fields(author, text, &image)).await {
            Ok(id) => id,
            Err(err) => {
                if !image.is_empty() {
                    // Accepted gap: the blob is not rolled back
                    tracing::warn!(%image, "post write failed after upload; stored blob is orphaned");
                }
                return Err(err.into());
            }
        };

        tracing::info!(%id, has_image = !image.is_empty(), "post submitted");
        Ok(id)
    }

    /// Submit a new comment on one post
    pub async fn submit_comment(
        &self,
        post_id: Uuid,
        author: &UserIdentity,
        text: &str,
    ) -> Result<Uuid> {
        if text.trim().is_empty() {
            return Err(AppError::Validation(
                "comment text must not be empty".to_string(),
            ));
        }

        let path = CollectionPath::root(&self.posts_collection)
            .subcollection(post_id, &self.comments_collection);
        let id = self.store.append(&path, comment_fields(author, text)).await?;

        tracing::info!(%id, %post_id, "comment submitted");
        Ok(id)
    }

    async fn upload_attachment(&self, attachment: Attachment) -> Result<String> {
        let key = storage_key::attachment_key(&self.upload_prefix, &attachment.filename);
        self.blobs
            .put(&key, attachment.bytes)
            .await
            .map_err(|err| AppError::Upload(err.to_string()))?;
        self.blobs
            .get_url(&key)
            .await
            .map_err(|err| AppError::Upload(err.to_string()))
    }
}

fn post_fields(author: &UserIdentity, text: &str, image: &str) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("username".to_string(), json!(author.display_name));
    fields.insert("avatar".to_string(), json!(author.photo_url));
    fields.insert("text".to_string(), json!(text));
    fields.insert("image".to_string(), json!(image));
    fields
}

fn comment_fields(author: &UserIdentity, text: &str) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("username".to_string(), json!(author.display_name));
    fields.insert("avatar".to_string(), json!(author.photo_url));
    fields.insert("text".to_string(), json!(text));
    fields
}
