/// Comment synchronizer - one post's comment thread
use crate::config::Config;
use crate::error::Result;
use crate::models::Comment;
use crate::sync::Synchronizer;
use docstore::{CollectionPath, DocumentStore};
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

/// Keeps a local replica of one post's comment sub-collection
///
/// Parameterized by the post id. `retarget` cancels the old
/// subscription before opening the new one, so at every instant at most
/// one subscription is active and it is scoped to the latest post id.
pub struct CommentSynchronizer {
    store: Arc<dyn DocumentStore>,
    posts_collection: String,
    comments_collection: String,
    post_id: Uuid,
    inner: Synchronizer<Comment>,
}

impl CommentSynchronizer {
    pub async fn start(
        store: Arc<dyn DocumentStore>,
        config: &Config,
        post_id: Uuid,
    ) -> Result<Self> {
        let posts_collection = config.store.posts_collection.clone();
        let comments_collection = config.store.comments_collection.clone();
        let path = comment_path(&posts_collection, &comments_collection, post_id);
        tracing::debug!(%path, "starting comment synchronizer");
        let inner = Synchronizer::open(&store, path).await?;
        Ok(Self {
            store,
            posts_collection,
            comments_collection,
            post_id,
            inner,
        })
    }

    /// Switch to another post's comment thread
    ///
    /// The previous subscription is cancelled before the new one opens;
    /// it never leaks past this call. Retargeting to the current post id
    /// keeps the existing subscription. Watch handles taken before the
    /// switch stay on the old thread's final snapshot; re-acquire them
    /// afterwards.
    pub async fn retarget(&mut self, post_id: Uuid) -> Result<()> {
        if post_id == self.post_id {
            return Ok(());
        }

        self.inner.stop().await;
        let path = comment_path(&self.posts_collection, &self.comments_collection, post_id);
        tracing::debug!(%path, old_post_id = %self.post_id, "comment synchronizer retargeted");
        self.inner = Synchronizer::open(&self.store, path).await?;
        self.post_id = post_id;
        Ok(())
    }

    /// Post id the active subscription is scoped to
    pub fn post_id(&self) -> Uuid {
        self.post_id
    }

    /// Current comment snapshot, descending by creation timestamp
    pub fn snapshot(&self) -> Vec<Comment> {
        self.inner.snapshot()
    }

    /// Watch handle; the value is replaced on every remote change
    pub fn watch_comments(&self) -> watch::Receiver<Vec<Comment>> {
        self.inner.watch()
    }

    pub async fn stop(&mut self) {
        self.inner.stop().await;
    }
}

fn comment_path(posts: &str, comments: &str, post_id: Uuid) -> CollectionPath {
    CollectionPath::root(posts).subcollection(post_id, comments)
}
