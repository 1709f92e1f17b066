//! Wire messages and API response shapes.
//!
//! Broadcasts arrive on the real-time channel as JSON objects:
//!
//! ```json
//! {"kind": "sale", "payload": {"id": "...", ...}, "originatorId": "user-1"}
//! ```
//!
//! [`BroadcastEnvelope`] reads that object without failing on missing or
//! mistyped fields, so the reconciler can classify every malformation.
//! [`BroadcastMessage`] is the validated form.

use crate::error::{SyncError, SyncResult};
use oreline_model::{Record, validate};
use oreline_types::{EntityId, EntityKind, PaginationWindow, UserId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A broadcast as read off the wire, every field optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BroadcastEnvelope {
    pub kind: Option<String>,
    pub payload: Option<Value>,
    pub originator_id: Option<String>,
}

impl BroadcastEnvelope {
    /// Reads an envelope out of a JSON object. Fails only on non-objects;
    /// fields of the wrong type read as absent.
    pub fn from_value(value: Value) -> SyncResult<Self> {
        let Value::Object(mut object) = value else {
            return Err(SyncError::Protocol("broadcast must be a JSON object".into()));
        };
        let kind = take_string(&mut object, "kind");
        let originator_id = take_string(&mut object, "originatorId");
        let payload = object.remove("payload").filter(|p| !p.is_null());
        Ok(Self {
            kind,
            payload,
            originator_id,
        })
    }
}

fn take_string(object: &mut Map<String, Value>, key: &str) -> Option<String> {
    match object.remove(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

/// A validated change notification: a full entity snapshot of a known kind.
#[derive(Debug, Clone, PartialEq)]
pub struct BroadcastMessage {
    pub kind: EntityKind,
    pub payload: Record,
    pub originator_id: UserId,
}

impl BroadcastMessage {
    /// Creates a new broadcast message.
    pub fn new(kind: EntityKind, payload: Record, originator_id: impl Into<UserId>) -> Self {
        Self {
            kind,
            payload,
            originator_id: originator_id.into(),
        }
    }

    /// Parses and type-checks a wire message.
    pub fn from_value(value: Value) -> SyncResult<Self> {
        Self::try_from(BroadcastEnvelope::from_value(value)?)
    }

    /// Parses a JSON string.
    pub fn from_json(json: &str) -> SyncResult<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// The wire form of this message.
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("kind".into(), Value::String(self.kind.as_str().to_string()));
        object.insert("payload".into(), self.payload.to_value());
        object.insert(
            "originatorId".into(),
            Value::String(self.originator_id.to_string()),
        );
        Value::Object(object)
    }
}

impl TryFrom<BroadcastEnvelope> for BroadcastMessage {
    type Error = SyncError;

    fn try_from(envelope: BroadcastEnvelope) -> SyncResult<Self> {
        let originator_id = envelope
            .originator_id
            .ok_or_else(|| SyncError::Protocol("missing originatorId".into()))?;
        let kind = envelope
            .kind
            .ok_or_else(|| SyncError::Protocol("missing kind".into()))?;
        let kind = kind
            .parse::<EntityKind>()
            .map_err(|_| SyncError::UnknownKind(kind))?;
        let payload = envelope
            .payload
            .ok_or_else(|| SyncError::Protocol("missing payload".into()))?;
        let payload = Record::from_value(payload)?;
        validate(kind, &payload)?;
        Ok(Self {
            kind,
            payload,
            originator_id: UserId::from(originator_id),
        })
    }
}

/// One page of a fetch or search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResponse {
    pub items: Vec<Record>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl PageResponse {
    /// The pagination window this page describes.
    pub fn window(&self) -> oreline_types::Result<PaginationWindow> {
        PaginationWindow::new(self.page, self.limit, self.total)
    }
}

/// What a network collaborator call resolved with.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// A page of entities (fetch, search).
    Page(PageResponse),
    /// A single entity (create, update, fetch by id).
    Entity(Record),
    /// The entity was deleted.
    Deleted(EntityId),
}
