/// Live subscription-to-view synchronization
///
/// One-directional data flow: each synchronizer owns a single live
/// subscription and publishes immutable snapshots through a
/// `tokio::sync::watch` channel. Every remote notification replaces the
/// published snapshot wholesale; there is no client-side merge or
/// diffing. Views read or watch the channel and never touch the
/// subscription directly.
use crate::error::{AppError, Result};
use crate::models::FromDocument;
use docstore::{CancelHandle, CollectionPath, Direction, DocumentStore, OrderBy, Snapshot};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub mod comments;
pub mod feed;

pub use comments::CommentSynchronizer;
pub use feed::FeedSynchronizer;

/// Generic snapshot synchronizer over one ordered collection
///
/// Holds the subscription's cancellation handle and the drain task.
/// `stop` cancels exactly once and waits for the drain task; calling it
/// again is a no-op. Dropping without `stop` still cancels.
pub(crate) struct Synchronizer<T> {
    rx: watch::Receiver<Vec<T>>,
    cancel: CancelHandle,
    task: Option<JoinHandle<()>>,
}

impl<T> Synchronizer<T>
where
    T: FromDocument + Clone + Send + Sync + 'static,
{
    /// Subscribe descending by creation timestamp and apply the initial
    /// snapshot before returning, so a freshly started synchronizer
    /// already reflects every record appended before subscription.
    pub(crate) async fn open(
        store: &Arc<dyn DocumentStore>,
        path: CollectionPath,
    ) -> Result<Self> {
        let mut sub = store
            .subscribe(&path, OrderBy::created_at(Direction::Descending))
            .await
            .map_err(|err| AppError::Subscription(err.to_string()))?;
        let cancel = sub.cancel_handle();

        let initial = match sub.recv().await {
            Some(snapshot) => decode::<T>(&snapshot),
            None => Vec::new(),
        };
        let (tx, rx) = watch::channel(initial);

        let task = tokio::spawn(async move {
            while let Some(snapshot) = sub.recv().await {
                tx.send_replace(decode::<T>(&snapshot));
            }
        });

        Ok(Self {
            rx,
            cancel,
            task: Some(task),
        })
    }

    /// Clone of the currently published snapshot
    pub(crate) fn snapshot(&self) -> Vec<T> {
        self.rx.borrow().clone()
    }

    /// Watch handle for reacting to snapshot replacements
    pub(crate) fn watch(&self) -> watch::Receiver<Vec<T>> {
        self.rx.clone()
    }

    /// Cancel the subscription and wait for the drain task; idempotent
    pub(crate) async fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl<T> Drop for Synchronizer<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn decode<T: FromDocument>(snapshot: &Snapshot) -> Vec<T> {
    snapshot.iter().map(T::from_document).collect()
}
