//! Synchronization facade: the single entry point for the rest of the app.
//!
//! The facade owns the session's collections and lifecycle statuses. UI
//! actions go through [`SyncFacade::run_mutation`] (or the typed helpers
//! built on it), and the real-time channel goes through
//! [`SyncFacade::ingest_broadcast`]. Nothing else can write to a collection.
//!
//! State sits behind one lock that is only ever held for synchronous
//! critical sections, never across a network await. Each broadcast
//! reconciliation and each application of a network result is therefore
//! atomic, and outstanding calls complete independently: whichever write
//! is applied last wins.

use crate::cascade::CascadeRuleTable;
use crate::error::{ApiError, ApiResult};
use crate::lifecycle::{LifecycleSnapshot, LifecycleState, LifecycleTracker};
use crate::protocol::{ApiResponse, BroadcastMessage};
use crate::reconciler::{BroadcastReconciler, ReconcileOutcome};
use crate::store::{CollectionSnapshot, Collections, InsertMode};
use crate::transport::{BroadcastSource, CollectionApi, SearchCriteria};
use oreline_model::Record;
use oreline_types::{EntityId, EntityKind, Operation, PaginationWindow, UserId};
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Configuration for the sync facade.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Page size of collections before their first fetch.
    pub default_limit: u32,
    /// Ignore broadcasts originated by the session user.
    pub suppress_self_echo: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            suppress_self_echo: true,
        }
    }
}

#[derive(Debug)]
struct SessionState {
    collections: Collections,
    lifecycle: LifecycleTracker,
}

/// The session's synchronized state and the only way to change it.
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct SyncFacade {
    config: SyncConfig,
    state: Arc<RwLock<SessionState>>,
    reconciler: Arc<BroadcastReconciler>,
}

impl SyncFacade {
    /// Creates a facade with the standard cascade rules.
    pub fn new(user: UserId, config: SyncConfig) -> Self {
        Self::with_rules(user, config, CascadeRuleTable::standard())
    }

    /// Creates a facade with a custom cascade rule table.
    pub fn with_rules(user: UserId, config: SyncConfig, rules: CascadeRuleTable) -> Self {
        let reconciler = BroadcastReconciler::new(user, Arc::new(rules))
            .with_self_echo_suppression(config.suppress_self_echo);
        Self {
            state: Arc::new(RwLock::new(SessionState {
                collections: Collections::new(config.default_limit),
                lifecycle: LifecycleTracker::new(),
            })),
            reconciler: Arc::new(reconciler),
            config,
        }
    }

    /// Returns the session user.
    pub fn local_user(&self) -> &UserId {
        self.reconciler.local_user()
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    // ── Mutations ────────────────────────────────────────────────

    /// Runs one network call through the lifecycle of `(kind, operation)`.
    ///
    /// On success the response is applied to the store:
    /// - create + entity: prepended, `total` + 1
    /// - update or fetch + entity: replaced in place
    /// - fetch or search + page: page replaced
    /// - delete + deleted id: removed, `total` - 1
    ///
    /// On rejection, or a response that does not fit the operation, the
    /// lifecycle fails with the message and the store is left untouched.
    pub async fn run_mutation<F>(
        &self,
        kind: EntityKind,
        operation: Operation,
        call: F,
    ) -> LifecycleState
    where
        F: Future<Output = ApiResult<ApiResponse>>,
    {
        self.state.write().await.lifecycle.begin(kind, operation);
        debug!("{} {} pending", operation, kind);

        let result = call.await;

        let mut state = self.state.write().await;
        let applied = result.and_then(|response| {
            apply_response(&mut state.collections, kind, operation, response)
        });
        match applied {
            Ok(()) => {
                state.lifecycle.succeed(kind, operation);
                debug!("{} {} succeeded", operation, kind);
            }
            Err(e) => {
                warn!("{} {} failed: {}", operation, kind, e);
                state.lifecycle.fail(kind, operation, e.to_string());
            }
        }
        state.lifecycle.state(kind, operation)
    }

    /// Fetches one page.
    pub async fn fetch(&self, api: &dyn CollectionApi, page: u32, limit: u32) -> LifecycleState {
        self.run_mutation(api.kind(), Operation::Fetch, async {
            api.fetch(page, limit).await.map(ApiResponse::Page)
        })
        .await
    }

    /// Fetches one entity and replaces the local copy.
    pub async fn get_by_id(&self, api: &dyn CollectionApi, id: &EntityId) -> LifecycleState {
        self.run_mutation(api.kind(), Operation::Fetch, async {
            api.get_by_id(id).await.map(ApiResponse::Entity)
        })
        .await
    }

    pub async fn create(&self, api: &dyn CollectionApi, data: Map<String, Value>) -> LifecycleState {
        self.run_mutation(api.kind(), Operation::Create, async {
            api.create(data).await.map(ApiResponse::Entity)
        })
        .await
    }

    pub async fn update(
        &self,
        api: &dyn CollectionApi,
        id: &EntityId,
        data: Map<String, Value>,
    ) -> LifecycleState {
        self.run_mutation(api.kind(), Operation::Update, async {
            api.update(id, data).await.map(ApiResponse::Entity)
        })
        .await
    }

    pub async fn delete(&self, api: &dyn CollectionApi, id: &EntityId) -> LifecycleState {
        self.run_mutation(api.kind(), Operation::Delete, async {
            api.delete(id).await.map(|()| ApiResponse::Deleted(id.clone()))
        })
        .await
    }

    pub async fn search(
        &self,
        api: &dyn CollectionApi,
        criteria: &SearchCriteria,
        page: u32,
        limit: u32,
    ) -> LifecycleState {
        self.run_mutation(api.kind(), Operation::Search, async {
            api.search(criteria, page, limit).await.map(ApiResponse::Page)
        })
        .await
    }

    /// Returns `(kind, operation)` to idle, dropping its error message.
    pub async fn reset(&self, kind: EntityKind, operation: Operation) {
        self.state.write().await.lifecycle.reset(kind, operation);
    }

    /// Session teardown (logout): empties every collection and status.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.collections.clear();
        state.lifecycle.clear();
        info!("Cleared synchronized state for {}", self.local_user());
    }

    // ── Broadcasts ───────────────────────────────────────────────

    /// Reconciles one raw message from the real-time channel.
    pub async fn ingest_broadcast(&self, raw: Value) -> ReconcileOutcome {
        let mut state = self.state.write().await;
        self.reconciler.reconcile_value(raw, &mut state.collections)
    }

    /// Reconciles one validated message.
    pub async fn ingest(&self, message: BroadcastMessage) -> ReconcileOutcome {
        let mut state = self.state.write().await;
        self.reconciler.reconcile(message, &mut state.collections)
    }

    /// Drains `source` in arrival order, each message fully reconciled
    /// before the next is read. Returns the number of messages processed.
    pub async fn run_broadcast_loop<S: BroadcastSource>(&self, mut source: S) -> usize {
        let mut processed = 0;
        let mut applied = 0;
        while let Some(raw) = source.next_message().await {
            if self.ingest_broadcast(raw).await.is_applied() {
                applied += 1;
            }
            processed += 1;
        }
        info!(
            "Broadcast channel closed after {} messages ({} applied)",
            processed, applied
        );
        processed
    }

    // ── Read accessors ───────────────────────────────────────────

    /// Records of the current page, in display order.
    pub async fn page(&self, kind: EntityKind) -> Vec<Record> {
        let state = self.state.read().await;
        state
            .collections
            .get(kind)
            .map(|c| c.page())
            .unwrap_or_default()
    }

    pub async fn window(&self, kind: EntityKind) -> PaginationWindow {
        let state = self.state.read().await;
        state
            .collections
            .get(kind)
            .map(|c| c.window())
            .unwrap_or_else(|| PaginationWindow::first_page(self.config.default_limit))
    }

    pub async fn snapshot(&self, kind: EntityKind) -> CollectionSnapshot {
        let state = self.state.read().await;
        state
            .collections
            .get(kind)
            .map(|c| c.snapshot())
            .unwrap_or_else(|| CollectionSnapshot {
                items: Vec::new(),
                window: PaginationWindow::first_page(self.config.default_limit),
            })
    }

    pub async fn get(&self, kind: EntityKind, id: &EntityId) -> Option<Record> {
        let state = self.state.read().await;
        state.collections.get(kind)?.get(id).cloned()
    }

    pub async fn lifecycle(&self, kind: EntityKind) -> LifecycleSnapshot {
        self.state.read().await.lifecycle.snapshot(kind)
    }

    pub async fn status(&self, kind: EntityKind, operation: Operation) -> LifecycleState {
        self.state.read().await.lifecycle.state(kind, operation)
    }

    /// `(kind, operation)` pairs with a call in flight.
    pub async fn pending(&self) -> Vec<(EntityKind, Operation)> {
        self.state.read().await.lifecycle.pending()
    }
}

fn apply_response(
    collections: &mut Collections,
    kind: EntityKind,
    operation: Operation,
    response: ApiResponse,
) -> ApiResult<()> {
    match (operation, response) {
        (Operation::Create, ApiResponse::Entity(record)) => {
            collections.upsert(kind, record, InsertMode::New);
        }
        (Operation::Update | Operation::Fetch, ApiResponse::Entity(record)) => {
            collections.upsert(kind, record, InsertMode::Known);
        }
        (Operation::Fetch | Operation::Search, ApiResponse::Page(page)) => {
            let window = page.window()?;
            collections.replace_page(kind, page.items, window);
        }
        (Operation::Delete, ApiResponse::Deleted(id)) => {
            collections.record_deletion(kind, &id);
        }
        (operation, _) => return Err(ApiError::UnexpectedResponse { operation }),
    }
    Ok(())
}
