/// Feed synchronizer - the globally ordered post list
use crate::config::Config;
use crate::error::Result;
use crate::models::Post;
use crate::sync::Synchronizer;
use docstore::{CollectionPath, DocumentStore};
use std::sync::Arc;
use tokio::sync::watch;

/// Keeps a local replica of the post collection, newest first
///
/// On start it opens exactly one live subscription; every notification
/// replaces the whole local snapshot. `stop` cancels the subscription
/// exactly once and may be called any number of times.
pub struct FeedSynchronizer {
    inner: Synchronizer<Post>,
}

impl FeedSynchronizer {
    pub async fn start(store: Arc<dyn DocumentStore>, config: &Config) -> Result<Self> {
        let path = CollectionPath::root(&config.store.posts_collection);
        tracing::debug!(%path, "starting feed synchronizer");
        let inner = Synchronizer::open(&store, path).await?;
        Ok(Self { inner })
    }

    /// Current feed snapshot, descending by creation timestamp
    pub fn snapshot(&self) -> Vec<Post> {
        self.inner.snapshot()
    }

    /// Watch handle; the value is replaced on every remote change
    pub fn watch_posts(&self) -> watch::Receiver<Vec<Post>> {
        self.inner.watch()
    }

    pub async fn stop(&mut self) {
        self.inner.stop().await;
    }
}
