//! Broadcast reconciler - applies change notifications to the collections.
//!
//! A notification carries a full snapshot of one entity, written by some
//! other client. Reconciling it means:
//!
//! 1. dropping it if this session sent it (self-echo)
//! 2. resolving its kind
//! 3. replacing the local copy wholesale (last writer wins, no merge)
//! 4. patching the embedded copies the cascade rule table declares
//!
//! Malformed or unknown messages are dropped and logged. Nothing here
//! fails: reconciliation runs outside any user action, so there is nobody
//! to report an error to.

use crate::cascade::CascadeRuleTable;
use crate::protocol::{BroadcastEnvelope, BroadcastMessage};
use crate::store::{Collections, InsertMode, UpsertOutcome};
use oreline_model::{Record, validate};
use oreline_types::{EntityId, EntityKind, UserId};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Why a broadcast was discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    NotAnObject,
    MissingOriginator,
    MissingKind,
    /// A kind this client does not know yet.
    UnknownKind(String),
    MissingPayload,
    InvalidPayload(String),
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::NotAnObject => f.write_str("message is not a JSON object"),
            DropReason::MissingOriginator => f.write_str("missing originatorId"),
            DropReason::MissingKind => f.write_str("missing kind"),
            DropReason::UnknownKind(kind) => write!(f, "unknown kind {kind:?}"),
            DropReason::MissingPayload => f.write_str("missing payload"),
            DropReason::InvalidPayload(reason) => write!(f, "invalid payload: {reason}"),
        }
    }
}

/// What reconciling a message did to the collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    pub kind: EntityKind,
    pub id: EntityId,
    pub primary: UpsertOutcome,
    /// Target entities patched by cascade rules.
    pub patched: usize,
    /// Cascade patches whose target is not held locally.
    pub stale: usize,
}

/// Outcome of one broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Sent by this session; ignored.
    SelfEcho,
    Dropped(DropReason),
    Applied(ApplyReport),
}

impl ReconcileOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ReconcileOutcome::Applied(_))
    }
}

/// Turns broadcast messages into collection mutations.
pub struct BroadcastReconciler {
    local_user: UserId,
    rules: Arc<CascadeRuleTable>,
    suppress_self_echo: bool,
}

impl BroadcastReconciler {
    /// Creates a reconciler for the given session user.
    pub fn new(local_user: UserId, rules: Arc<CascadeRuleTable>) -> Self {
        Self {
            local_user,
            rules,
            suppress_self_echo: true,
        }
    }

    /// Enables or disables self-echo suppression.
    pub fn with_self_echo_suppression(mut self, suppress: bool) -> Self {
        self.suppress_self_echo = suppress;
        self
    }

    pub fn local_user(&self) -> &UserId {
        &self.local_user
    }

    /// Reconciles a raw wire message.
    pub fn reconcile_value(&self, raw: Value, collections: &mut Collections) -> ReconcileOutcome {
        let envelope = match BroadcastEnvelope::from_value(raw) {
            Ok(envelope) => envelope,
            Err(_) => return self.drop_message(DropReason::NotAnObject),
        };

        let Some(originator) = envelope.originator_id else {
            return self.drop_message(DropReason::MissingOriginator);
        };
        if self.is_self_echo(originator.as_str()) {
            debug!("Skipping self-echo broadcast from {}", originator);
            return ReconcileOutcome::SelfEcho;
        }

        let Some(kind_name) = envelope.kind else {
            return self.drop_message(DropReason::MissingKind);
        };
        let Ok(kind) = kind_name.parse::<EntityKind>() else {
            return self.drop_message(DropReason::UnknownKind(kind_name));
        };

        let Some(payload) = envelope.payload else {
            return self.drop_message(DropReason::MissingPayload);
        };
        let payload = match Record::from_value(payload) {
            Ok(record) => record,
            Err(e) => return self.drop_message(DropReason::InvalidPayload(e.to_string())),
        };
        if let Err(e) = validate(kind, &payload) {
            return self.drop_message(DropReason::InvalidPayload(e.to_string()));
        }

        self.apply(kind, payload, collections)
    }

    /// Reconciles an already validated message.
    pub fn reconcile(
        &self,
        message: BroadcastMessage,
        collections: &mut Collections,
    ) -> ReconcileOutcome {
        if self.is_self_echo(message.originator_id.as_str()) {
            debug!("Skipping self-echo broadcast from {}", message.originator_id);
            return ReconcileOutcome::SelfEcho;
        }
        self.apply(message.kind, message.payload, collections)
    }

    fn is_self_echo(&self, originator: &str) -> bool {
        self.suppress_self_echo && originator == self.local_user.as_str()
    }

    fn apply(
        &self,
        kind: EntityKind,
        payload: Record,
        collections: &mut Collections,
    ) -> ReconcileOutcome {
        // Plan before the payload moves into the store.
        let patches = match self.rules.plan(kind, &payload) {
            Ok(patches) => patches,
            Err(e) => {
                warn!("Cascade extraction failed for {} {}: {}", kind, payload.id, e);
                Vec::new()
            }
        };

        let id = payload.id.clone();
        let primary = collections.upsert(kind, payload, InsertMode::New);

        let mut patched = 0;
        let mut stale = 0;
        for patch in &patches {
            let matched = collections.patch_matching(
                patch.target,
                patch.match_field,
                &patch.match_value,
                &patch.fields,
            );
            if matched == 0 {
                stale += 1;
            }
            patched += matched;
        }

        debug!(
            "Applied {} broadcast for {} ({:?}, {} patched, {} stale)",
            kind, id, primary, patched, stale
        );
        ReconcileOutcome::Applied(ApplyReport {
            kind,
            id,
            primary,
            patched,
            stale,
        })
    }

    fn drop_message(&self, reason: DropReason) -> ReconcileOutcome {
        match &reason {
            DropReason::UnknownKind(kind) => debug!("Dropping broadcast of unknown kind {}", kind),
            other => warn!("Dropping malformed broadcast: {}", other),
        }
        ReconcileOutcome::Dropped(reason)
    }
}
