/// Backend traits and the live subscription handle
///
/// `DocumentStore` covers the two operations the client actually uses:
/// one-shot appends and live ordered subscriptions. `BlobStore` covers
/// attachment bytes. Both are object-safe so stores can be shared as
/// `Arc<dyn DocumentStore>` across views.
use crate::collection::{CollectionPath, OrderBy, Snapshot};
use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

/// Ordered document collections with append and live subscription
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Append a record; the store assigns the id and the server
    /// timestamp
    async fn append(&self, path: &CollectionPath, fields: Map<String, Value>) -> Result<Uuid>;

    /// Open a live subscription. The first notification is the full
    /// current snapshot; every later notification is the full snapshot
    /// after a change. Never a partial patch.
    async fn subscribe(&self, path: &CollectionPath, order: OrderBy) -> Result<Subscription>;
}

/// Content-addressed blob storage for attachments
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Durably store bytes under a key
    async fn put(&self, key: &str, data: Bytes) -> Result<()>;

    /// Retrieval URL for a stored blob; `NotFound` for unknown keys
    async fn get_url(&self, key: &str) -> Result<String>;
}

struct CancelInner {
    cancelled: AtomicBool,
    unregister: Box<dyn Fn() + Send + Sync>,
}

/// Cancellation handle for one subscription
///
/// Cloneable so the owner of the receiving side and the task draining it
/// can cancel independently. `cancel` runs the backend unregistration at
/// most once; every later call is a no-op.
#[derive(Clone)]
pub struct CancelHandle {
    inner: Arc<CancelInner>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::SeqCst) {
            (self.inner.unregister)();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }
}

/// Live subscription to one ordered collection
///
/// Backend-agnostic: the backend delivers full snapshots through an
/// unbounded channel and supplies an unregistration closure invoked on
/// the first (and only effective) cancel. Dropping the subscription
/// cancels it.
pub struct Subscription {
    rx: UnboundedReceiver<Snapshot>,
    handle: CancelHandle,
}

impl Subscription {
    pub fn new(
        rx: UnboundedReceiver<Snapshot>,
        unregister: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            rx,
            handle: CancelHandle {
                inner: Arc::new(CancelInner {
                    cancelled: AtomicBool::new(false),
                    unregister: Box::new(unregister),
                }),
            },
        }
    }

    /// Next snapshot notification; `None` once the subscription is
    /// cancelled or the backend dropped its sender
    pub async fn recv(&mut self) -> Option<Snapshot> {
        if self.handle.is_cancelled() {
            return None;
        }
        self.rx.recv().await
    }

    /// Idempotent cancellation; safe to call any number of times
    pub fn cancel(&self) {
        self.handle.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.handle.is_cancelled()
    }

    /// Detached handle for cancelling from outside the draining task
    pub fn cancel_handle(&self) -> CancelHandle {
        self.handle.clone()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.cancel();
    }
}
