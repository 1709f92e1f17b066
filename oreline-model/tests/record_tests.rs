use oreline_model::{ModelError, Record};
use oreline_types::EntityId;
use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};

fn make_record(value: Value) -> Record {
    Record::from_value(value).unwrap()
}

fn partial(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

// ── Construction ─────────────────────────────────────────────────

#[test]
fn from_value_splits_id_and_fields() {
    let record = make_record(json!({"id": "lot-1", "weightIn": 120.5, "status": "in stock"}));
    assert_eq!(record.id, EntityId::from("lot-1"));
    assert_eq!(record.fields.len(), 2);
    assert_eq!(record.fields["status"], "in stock");
    assert!(!record.fields.contains_key("id"));
}

#[test]
fn from_value_rejects_non_objects() {
    assert!(matches!(
        Record::from_value(json!([1, 2])),
        Err(ModelError::NotAnObject)
    ));
}

#[test]
fn from_value_requires_string_id() {
    assert!(matches!(
        Record::from_value(json!({"name": "x"})),
        Err(ModelError::MissingId)
    ));
    assert!(matches!(
        Record::from_value(json!({"id": 7})),
        Err(ModelError::MissingId)
    ));
    assert!(matches!(
        Record::from_value(json!({"id": ""})),
        Err(ModelError::MissingId)
    ));
}

#[test]
fn to_value_is_flat() {
    let record = Record::new("s-1").with("name", "Kivu Mining");
    assert_eq!(record.to_value(), json!({"id": "s-1", "name": "Kivu Mining"}));
}

#[test]
fn serde_matches_to_value() {
    let record = make_record(json!({"id": "s-1", "name": "Kivu Mining", "phone": "0788"}));
    let serialized = serde_json::to_value(&record).unwrap();
    assert_eq!(serialized, record.to_value());

    let back: Record = serde_json::from_value(serialized).unwrap();
    assert_eq!(back, record);
}

// ── Accessors ────────────────────────────────────────────────────

#[test]
fn field_resolves_id() {
    let record = Record::new("e-1").with("amount", 30);
    assert_eq!(record.field("id"), Some(json!("e-1")));
    assert_eq!(record.field("amount"), Some(json!(30)));
    assert_eq!(record.field("missing"), None);
}

#[test]
fn pointer_helpers() {
    let record = make_record(json!({
        "id": "p-1",
        "amount": 250.0,
        "approved": true,
        "supplier": {"name": "Rubaya Coop"}
    }));
    assert_eq!(record.get_number("/amount"), Some(250.0));
    assert_eq!(record.get_bool("/approved"), Some(true));
    assert_eq!(record.get_str("/supplier/name"), Some("Rubaya Coop"));
    assert_eq!(record.get_str("/amount"), None);
    assert_eq!(record.get_str("amount"), None);
}

// ── Partial merge ────────────────────────────────────────────────

#[test]
fn merge_preserves_unrelated_fields() {
    let mut record = make_record(json!({
        "id": "lot-1",
        "weightIn": 80,
        "status": "in stock",
        "supplier": "s-1"
    }));
    let changed = record.merge(&partial(json!({"status": "sold"})));

    assert!(changed);
    assert_eq!(
        record.to_value(),
        json!({"id": "lot-1", "weightIn": 80, "status": "sold", "supplier": "s-1"})
    );
}

#[test]
fn merge_never_rewrites_id() {
    let mut record = Record::new("lot-1");
    let changed = record.merge(&partial(json!({"id": "lot-2"})));
    assert!(!changed);
    assert_eq!(record.id, EntityId::from("lot-1"));
}

#[test]
fn merge_reports_no_change_for_equal_values() {
    let mut record = Record::new("lot-1").with("status", "sold");
    assert!(!record.merge(&partial(json!({"status": "sold"}))));
}

#[test]
fn project_keeps_only_present_named_fields() {
    let record = make_record(json!({"id": "i-1", "status": "sold", "weight": 3}));
    let projected = record.project(&["status", "paid"]);
    assert_eq!(Value::Object(projected), json!({"status": "sold"}));
}
