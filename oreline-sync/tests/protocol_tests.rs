use oreline_model::Record;
use oreline_sync::protocol::{BroadcastEnvelope, BroadcastMessage, PageResponse};
use oreline_sync::SyncError;
use oreline_types::{EntityKind, PaginationWindow, UserId};
use pretty_assertions::assert_eq;
use serde_json::json;

// ── Envelope ─────────────────────────────────────────────────────

#[test]
fn envelope_reads_all_fields() {
    let envelope = BroadcastEnvelope::from_value(json!({
        "kind": "sale",
        "payload": {"id": "s-1"},
        "originatorId": "user-1"
    }))
    .unwrap();
    assert_eq!(envelope.kind.as_deref(), Some("sale"));
    assert_eq!(envelope.payload, Some(json!({"id": "s-1"})));
    assert_eq!(envelope.originator_id.as_deref(), Some("user-1"));
}

#[test]
fn envelope_treats_mistyped_fields_as_absent() {
    let envelope = BroadcastEnvelope::from_value(json!({
        "kind": 3,
        "payload": null,
        "originatorId": ""
    }))
    .unwrap();
    assert_eq!(envelope, BroadcastEnvelope::default());
}

#[test]
fn envelope_rejects_non_objects() {
    assert!(matches!(
        BroadcastEnvelope::from_value(json!(["sale"])),
        Err(SyncError::Protocol(_))
    ));
}

// ── BroadcastMessage ─────────────────────────────────────────────

#[test]
fn message_from_json() {
    let message = BroadcastMessage::from_json(
        r#"{"kind":"advance_payment","payload":{"id":"a-1","amount":500,"supplier":"sup-1"},"originatorId":"user-2"}"#,
    )
    .unwrap();
    assert_eq!(message.kind, EntityKind::AdvancePayment);
    assert_eq!(message.payload.id.as_str(), "a-1");
    assert_eq!(message.originator_id, UserId::from("user-2"));
}

#[test]
fn message_to_value_matches_wire_shape() {
    let message = BroadcastMessage::new(
        EntityKind::ExpenseType,
        Record::new("et-1").with("name", "Fuel"),
        "user-3",
    );
    assert_eq!(
        message.to_value(),
        json!({"kind": "expense_type", "payload": {"id": "et-1", "name": "Fuel"}, "originatorId": "user-3"})
    );
    assert_eq!(BroadcastMessage::from_value(message.to_value()).unwrap(), message);
}

#[test]
fn message_errors_are_classified() {
    let unknown = BroadcastMessage::from_value(json!({
        "kind": "smelter", "payload": {"id": "x"}, "originatorId": "u"
    }));
    assert!(matches!(unknown, Err(SyncError::UnknownKind(kind)) if kind == "smelter"));

    let missing = BroadcastMessage::from_value(json!({"kind": "sale", "payload": {"id": "x"}}));
    assert!(matches!(missing, Err(SyncError::Protocol(_))));

    let invalid = BroadcastMessage::from_value(json!({
        "kind": "expense", "payload": {"id": "e-1", "amount": "lots"}, "originatorId": "u"
    }));
    assert!(matches!(invalid, Err(SyncError::Model(_))));

    assert!(matches!(
        BroadcastMessage::from_json("{not json"),
        Err(SyncError::Serialization(_))
    ));
}

// ── PageResponse ─────────────────────────────────────────────────

#[test]
fn page_response_deserializes() {
    let page: PageResponse = serde_json::from_value(json!({
        "items": [{"id": "sup-1", "name": "A"}, {"id": "sup-2", "name": "B"}],
        "total": 42,
        "page": 3,
        "limit": 2
    }))
    .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[1].get_str("/name"), Some("B"));
    assert_eq!(page.window().unwrap(), PaginationWindow::new(3, 2, 42).unwrap());
}

#[test]
fn page_response_with_zero_limit_has_no_window() {
    let page = PageResponse {
        items: Vec::new(),
        total: 0,
        page: 1,
        limit: 0,
    };
    assert!(page.window().is_err());
}
