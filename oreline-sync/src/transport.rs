//! Collaborator abstractions.
//!
//! The sync core does not perform I/O. Each collection's REST endpoints are
//! reached through a [`CollectionApi`], and the real-time channel hands
//! messages over through a [`BroadcastSource`].

use crate::error::ApiResult;
use crate::protocol::PageResponse;
use async_trait::async_trait;
use oreline_model::Record;
use oreline_types::{EntityId, EntityKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::mpsc;

/// Free-form search filters, passed through to the API unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchCriteria(pub Map<String, Value>);

impl SearchCriteria {
    /// Creates empty criteria.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }
}

/// The remote API for one collection.
///
/// Every call is single-shot and may reject with a message.
#[async_trait]
pub trait CollectionApi: Send + Sync {
    /// The collection this API serves.
    fn kind(&self) -> EntityKind;

    async fn fetch(&self, page: u32, limit: u32) -> ApiResult<PageResponse>;

    async fn create(&self, data: Map<String, Value>) -> ApiResult<Record>;

    async fn get_by_id(&self, id: &EntityId) -> ApiResult<Record>;

    async fn update(&self, id: &EntityId, data: Map<String, Value>) -> ApiResult<Record>;

    async fn delete(&self, id: &EntityId) -> ApiResult<()>;

    async fn search(
        &self,
        criteria: &SearchCriteria,
        page: u32,
        limit: u32,
    ) -> ApiResult<PageResponse>;
}

/// Delivers raw broadcast messages in arrival order.
#[async_trait]
pub trait BroadcastSource: Send {
    /// Receives the next message.
    /// Returns `None` once the channel is closed.
    async fn next_message(&mut self) -> Option<Value>;
}

#[async_trait]
impl BroadcastSource for mpsc::Receiver<Value> {
    async fn next_message(&mut self) -> Option<Value> {
        self.recv().await
    }
}

#[async_trait]
impl BroadcastSource for mpsc::UnboundedReceiver<Value> {
    async fn next_message(&mut self) -> Option<Value> {
        self.recv().await
    }
}
