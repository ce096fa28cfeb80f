//! Document store trait for the schema-less collection database.

use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::result::AppResult;
use crate::types::document::{self, Document, Fields};
use crate::types::filter::Filter;

/// A stream of full collection snapshots. Each item replaces the previous one.
pub type SnapshotStream = Pin<Box<dyn Stream<Item = AppResult<Vec<Document>>> + Send>>;

/// Trait for networked or in-process document databases.
///
/// Every method is a single round trip; no retries and no timeouts are
/// applied on top of what the implementation itself does.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "memory").
    fn provider_type(&self) -> &str;

    /// Point lookup by id.
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>>;

    /// Return every document matching the filter, in store order.
    async fn query(&self, collection: &str, filter: &Filter) -> AppResult<Vec<Document>>;

    /// Open a live query. The subscription yields the current matching
    /// snapshot first and a fresh full snapshot after every change to
    /// the collection.
    async fn subscribe(&self, collection: &str, filter: Filter) -> AppResult<Subscription>;

    /// Insert a document under a store-generated id and return that id.
    async fn insert(&self, collection: &str, fields: Fields) -> AppResult<String>;

    /// Create or replace the document at a caller-chosen id.
    async fn set_at(&self, collection: &str, id: &str, fields: Fields) -> AppResult<()>;

    /// Create the document at a caller-chosen id only if no document holds
    /// that id yet. Fails with a conflict error otherwise.
    async fn create(&self, collection: &str, id: &str, fields: Fields) -> AppResult<()>;

    /// Merge the given fields into an existing document. Fails with a
    /// not-found error if the document does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> AppResult<()>;

    /// Delete a document. Deleting a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> AppResult<()>;

    /// A marker value resolved to the store's clock at write time.
    fn server_timestamp(&self) -> Value {
        document::server_timestamp()
    }
}

/// Cancellation handle for a live query, cloneable so the owner of a
/// screen or command can stop a subscription that another task is reading.
#[derive(Debug, Clone)]
pub struct SubscriptionHandle {
    token: CancellationToken,
}

impl SubscriptionHandle {
    /// Stop the subscription. The stream ends after the current item.
    pub fn unsubscribe(&self) {
        self.token.cancel();
    }

    /// Whether the subscription is still delivering snapshots.
    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }
}

/// A live query: a lazy, unbounded stream of snapshots with an explicit
/// unsubscribe handle. Dropping the subscription also unsubscribes.
pub struct Subscription {
    inner: SnapshotStream,
    handle: SubscriptionHandle,
}

impl Subscription {
    /// Wrap a raw snapshot stream.
    pub fn new(stream: SnapshotStream) -> Self {
        let token = CancellationToken::new();
        let inner = stream.take_until(token.clone().cancelled_owned()).boxed();
        Self {
            inner,
            handle: SubscriptionHandle { token },
        }
    }

    /// A handle that can cancel this subscription from elsewhere.
    pub fn handle(&self) -> SubscriptionHandle {
        self.handle.clone()
    }

    /// Stop receiving snapshots.
    pub fn unsubscribe(self) {
        self.handle.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.handle.is_active())
            .finish()
    }
}

impl Stream for Subscription {
    type Item = AppResult<Vec<Document>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.unsubscribe();
    }
}
