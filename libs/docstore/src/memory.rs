/// In-memory backend
///
/// Reference implementation of `DocumentStore` and `BlobStore` used by
/// tests and the demo binary. Collections are append-only vectors; the
/// store is the single writer of ids and server timestamps, and the
/// timestamp sequence is monotonically non-decreasing in insertion
/// order. Change fan-out keeps a per-collection subscriber list with
/// removal by subscriber id and cleanup of dead senders.
use crate::collection::{CollectionPath, Direction, Document, OrderBy, Snapshot};
use crate::error::{Result, StoreError};
use crate::store::{BlobStore, DocumentStore, Subscription};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use uuid::Uuid;

/// The only order key the in-memory backend serves
const ORDER_FIELD: &str = "created_at";

#[derive(Clone)]
struct StoredDocument {
    doc: Document,
    /// Insertion sequence, breaks ties between equal timestamps
    seq: u64,
}

struct Subscriber {
    id: Uuid,
    order: OrderBy,
    sender: UnboundedSender<Snapshot>,
}

struct ServerClock {
    last: DateTime<Utc>,
    seq: u64,
}

impl ServerClock {
    /// Assign the next server timestamp; never goes backwards even if
    /// the wall clock does
    fn assign(&mut self) -> (DateTime<Utc>, u64) {
        let now = Utc::now();
        if now > self.last {
            self.last = now;
        }
        self.seq += 1;
        (self.last, self.seq)
    }
}

struct MemoryInner {
    collections: RwLock<HashMap<CollectionPath, Vec<StoredDocument>>>,
    subscribers: RwLock<HashMap<CollectionPath, Vec<Subscriber>>>,
    clock: Mutex<ServerClock>,
}

/// In-memory document store with live snapshot fan-out
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                collections: RwLock::new(HashMap::new()),
                subscribers: RwLock::new(HashMap::new()),
                clock: Mutex::new(ServerClock {
                    last: Utc::now(),
                    seq: 0,
                }),
            }),
        }
    }

    /// Number of live subscriptions on one collection
    pub fn subscriber_count(&self, path: &CollectionPath) -> usize {
        self.inner
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .map(|subs| subs.len())
            .unwrap_or(0)
    }

    /// Number of documents currently stored in one collection
    pub fn document_count(&self, path: &CollectionPath) -> usize {
        self.inner
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }

    fn current_snapshot(&self, path: &CollectionPath, order: &OrderBy) -> Snapshot {
        let guard = self
            .inner
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        ordered_snapshot(guard.get(path).map(Vec::as_slice).unwrap_or(&[]), order)
    }

    /// Deliver the full snapshot to every subscriber of `path`,
    /// dropping subscribers whose receiving side went away
    fn notify(&self, path: &CollectionPath) {
        let docs: Vec<StoredDocument> = {
            let guard = self
                .inner
                .collections
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            guard.get(path).cloned().unwrap_or_default()
        };

        let mut guard = self
            .inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(subs) = guard.get_mut(path) {
            subs.retain(|sub| {
                let snapshot = ordered_snapshot(&docs, &sub.order);
                sub.sender.send(snapshot).is_ok()
            });
            if subs.is_empty() {
                guard.remove(path);
            }
        }
    }
}

fn ordered_snapshot(docs: &[StoredDocument], order: &OrderBy) -> Snapshot {
    let mut docs: Vec<StoredDocument> = docs.to_vec();
    docs.sort_by(|a, b| {
        (a.doc.created_at, a.seq).cmp(&(b.doc.created_at, b.seq))
    });
    if order.direction == Direction::Descending {
        docs.reverse();
    }
    docs.into_iter().map(|stored| stored.doc).collect()
}

fn remove_subscriber(inner: &MemoryInner, path: &CollectionPath, subscriber_id: Uuid) {
    let mut guard = inner
        .subscribers
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    if let Some(subs) = guard.get_mut(path) {
        subs.retain(|sub| sub.id != subscriber_id);
        if subs.is_empty() {
            guard.remove(path);
        }
    }
    tracing::debug!(%path, %subscriber_id, "subscription cancelled");
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn append(&self, path: &CollectionPath, fields: Map<String, Value>) -> Result<Uuid> {
        let (created_at, seq) = self
            .inner
            .clock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .assign();

        let id = Uuid::new_v4();
        {
            let mut guard = self
                .inner
                .collections
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            guard.entry(path.clone()).or_default().push(StoredDocument {
                doc: Document {
                    id,
                    created_at,
                    fields,
                },
                seq,
            });
        }
        tracing::debug!(%path, %id, "document appended");

        self.notify(path);
        Ok(id)
    }

    async fn subscribe(&self, path: &CollectionPath, order: OrderBy) -> Result<Subscription> {
        if order.field != ORDER_FIELD {
            return Err(StoreError::UnsupportedOrder(order.field));
        }

        let (tx, rx) = unbounded_channel();
        let subscriber_id = Uuid::new_v4();

        {
            // Initial snapshot and registration happen under the
            // subscriber lock so an append cannot slip between them.
            let mut guard = self
                .inner
                .subscribers
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let initial = self.current_snapshot(path, &order);
            let _ = tx.send(initial);
            guard.entry(path.clone()).or_default().push(Subscriber {
                id: subscriber_id,
                order,
                sender: tx,
            });
        }
        tracing::debug!(%path, %subscriber_id, "subscription opened");

        let inner = Arc::clone(&self.inner);
        let unregister_path = path.clone();
        Ok(Subscription::new(rx, move || {
            remove_subscriber(&inner, &unregister_path, subscriber_id);
        }))
    }
}

/// In-memory blob store
///
/// Keys map to byte payloads; retrieval URLs follow the public object
/// URL shape `https://{host}/{bucket}/{key}`.
pub struct MemoryBlobStore {
    host: String,
    bucket: String,
    blobs: RwLock<HashMap<String, Bytes>>,
}

impl MemoryBlobStore {
    pub fn new(host: &str, bucket: &str) -> Self {
        Self {
            host: host.to_string(),
            bucket: bucket.to_string(),
            blobs: RwLock::new(HashMap::new()),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn blob_count(&self) -> usize {
        self.blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        let size = data.len();
        self.blobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), data);
        tracing::debug!(key, size, "blob stored");
        Ok(())
    }

    async fn get_url(&self, key: &str) -> Result<String> {
        let guard = self.blobs.read().unwrap_or_else(PoisonError::into_inner);
        if !guard.contains_key(key) {
            return Err(StoreError::NotFound(key.to_string()));
        }
        Ok(format!("https://{}/{}/{}", self.host, self.bucket, key))
    }
}
