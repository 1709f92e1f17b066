//! Client-side synchronization core for the Oreline trading dashboard.
//!
//! Keeps the dashboard's in-memory collections (suppliers, sales, payments,
//! stock lots, ...) consistent with the remote API and with the changes
//! other users push over the real-time channel.
//!
//! # Architecture
//!
//! There is no CRDT and no persistence: the server is the source of truth,
//! local state lives for one session, and conflicts resolve as
//! last-writer-wins full-entity replacement.
//!
//! ## Components
//!
//! - **Store**: one keyed collection per entity kind with its page order
//!   and pagination window
//! - **Lifecycle**: idle/pending/succeeded/failed per collection and operation
//! - **Cascade**: the declarative table of embedded copies to patch when a
//!   primary entity changes
//! - **Reconciler**: applies broadcast notifications (self-echo
//!   suppression, full upsert, cascade patches)
//! - **Facade**: owns all of the above; the only way in
//!
//! ## Data flow
//!
//! 1. **Mutation**: UI action → `run_mutation` → lifecycle pending → API
//!    call → store updated and lifecycle succeeded, or lifecycle failed
//! 2. **Broadcast**: real-time message → `ingest_broadcast` → reconciler →
//!    primary upsert → cascade patches
//!
//! # Example
//!
//! ```
//! use oreline_sync::{SyncConfig, SyncFacade};
//! use oreline_types::UserId;
//!
//! let facade = SyncFacade::new(UserId::from("user-1"), SyncConfig::default());
//! assert_eq!(facade.local_user().as_str(), "user-1");
//! ```

pub mod cascade;
mod error;
mod facade;
pub mod lifecycle;
pub mod protocol;
pub mod reconciler;
pub mod store;
pub mod transport;

pub use cascade::{CascadePatch, CascadeRule, CascadeRuleTable, CascadeTarget, Extractor};
pub use error::{ApiError, ApiResult, SyncError, SyncResult};
pub use facade::{SyncConfig, SyncFacade};
pub use lifecycle::{LifecycleSnapshot, LifecycleState, LifecycleTracker};
pub use protocol::{ApiResponse, BroadcastEnvelope, BroadcastMessage, PageResponse};
pub use reconciler::{ApplyReport, BroadcastReconciler, DropReason, ReconcileOutcome};
pub use store::{Collection, CollectionSnapshot, Collections, InsertMode, UpsertOutcome};
pub use transport::{BroadcastSource, CollectionApi, SearchCriteria};
