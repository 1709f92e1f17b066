use oreline_model::Record;
use oreline_sync::cascade::{
    CascadeRule, CascadeRuleTable, CascadeTarget, PAYMENT_ITEM_FIELDS, SALE_ITEM_FIELDS,
};
use oreline_types::EntityKind;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn record(value: Value) -> Record {
    Record::from_value(value).unwrap()
}

fn sale() -> Record {
    record(json!({
        "id": "sale-1",
        "buyer": "b-1",
        "minerals": [
            {"id": "cas-1", "mineralType": "cassiterite", "status": "sold", "weight": 300.0},
            {"id": "col-1", "mineralType": "coltan", "status": "partially sold", "weight": 12.0}
        ]
    }))
}

#[test]
fn standard_table_sources() {
    let table = CascadeRuleTable::standard();
    assert_eq!(table.sources(), vec![EntityKind::Sale, EntityKind::Payment]);
    assert!(table.rule_for(EntityKind::Expense).is_none());

    let rule = table.rule_for(EntityKind::Sale).unwrap();
    let targets: Vec<_> = rule.targets.iter().map(|t| t.target).collect();
    assert_eq!(
        targets,
        [EntityKind::Cassiterite, EntityKind::Coltan, EntityKind::Wolframite]
    );
    assert!(rule.targets.iter().all(|t| t.fields == SALE_ITEM_FIELDS));
}

#[test]
fn sale_plan_routes_items_by_category_and_copies_status_only() {
    let patches = CascadeRuleTable::standard().plan(EntityKind::Sale, &sale()).unwrap();
    assert_eq!(patches.len(), 2);

    assert_eq!(patches[0].target, EntityKind::Cassiterite);
    assert_eq!(patches[0].match_field, "id");
    assert_eq!(patches[0].match_value, json!("cas-1"));
    assert_eq!(Value::Object(patches[0].fields.clone()), json!({"status": "sold"}));

    assert_eq!(patches[1].target, EntityKind::Coltan);
    assert_eq!(patches[1].match_value, json!("col-1"));
    assert_eq!(
        Value::Object(patches[1].fields.clone()),
        json!({"status": "partially sold"})
    );
}

#[test]
fn payment_plan_walks_all_three_arrays() {
    let payment = record(json!({
        "id": "pay-1",
        "amount": 1500.0,
        "cassiterite": [{"id": "cas-1", "paid": 700.0, "paymentStatus": "paid"}],
        "coltan": [
            {"id": "col-1", "paid": 300.0, "paymentStatus": "partial"},
            {"id": "col-2", "paid": 200.0, "paymentStatus": "paid"}
        ],
        "wolframite": [{"id": "wol-1", "paid": 300.0, "paymentStatus": "paid"}]
    }));
    let patches = CascadeRuleTable::standard().plan(EntityKind::Payment, &payment).unwrap();

    let routed: Vec<_> = patches
        .iter()
        .map(|p| (p.target, p.match_value.as_str().unwrap().to_string()))
        .collect();
    assert_eq!(
        routed,
        vec![
            (EntityKind::Cassiterite, "cas-1".to_string()),
            (EntityKind::Coltan, "col-1".to_string()),
            (EntityKind::Coltan, "col-2".to_string()),
            (EntityKind::Wolframite, "wol-1".to_string()),
        ]
    );
    for patch in &patches {
        let keys: Vec<_> = patch.fields.keys().map(String::as_str).collect();
        assert_eq!(keys, PAYMENT_ITEM_FIELDS);
    }
}

#[test]
fn patches_copy_item_values_as_sent() {
    let payment = record(json!({
        "id": "pay-2",
        "cassiterite": [{"id": "cas-1", "paid": 400, "paymentStatus": "paid"}],
        "coltan": [{"id": "col-1", "paid": 9_007_199_254_740_993_u64}]
    }));
    let patches = CascadeRuleTable::standard().plan(EntityKind::Payment, &payment).unwrap();

    assert_eq!(
        Value::Object(patches[0].fields.clone()),
        json!({"paid": 400, "paymentStatus": "paid"})
    );
    assert_ne!(patches[0].fields["paid"], json!(400.0));
    assert_eq!(patches[1].fields["paid"], json!(9_007_199_254_740_993_u64));
}

#[test]
fn sale_patches_keep_item_status_verbatim() {
    let sale = record(json!({
        "id": "sale-4",
        "minerals": [
            {"id": "col-1", "mineralType": "coltan", "status": "sold", "weight": "12"},
            {"id": "cas-1", "mineralType": "cassiterite", "status": "in stock"}
        ]
    }));
    let patches = CascadeRuleTable::standard().plan(EntityKind::Sale, &sale).unwrap();

    let routed: Vec<_> = patches
        .iter()
        .map(|p| (p.target, p.match_value.clone(), Value::Object(p.fields.clone())))
        .collect();
    assert_eq!(
        routed,
        vec![
            (EntityKind::Cassiterite, json!("cas-1"), json!({"status": "in stock"})),
            (EntityKind::Coltan, json!("col-1"), json!({"status": "sold"})),
        ]
    );
}

#[test]
fn items_without_copied_fields_yield_no_patch() {
    let sale = record(json!({
        "id": "sale-2",
        "minerals": [{"id": "wol-1", "mineralType": "wolframite", "weight": 5.0}]
    }));
    let patches = CascadeRuleTable::standard().plan(EntityKind::Sale, &sale).unwrap();
    assert!(patches.is_empty());
}

#[test]
fn kinds_without_rules_plan_nothing() {
    let expense = record(json!({"id": "e-1", "amount": 20.0}));
    let patches = CascadeRuleTable::standard().plan(EntityKind::Expense, &expense).unwrap();
    assert!(patches.is_empty());
}

#[test]
fn malformed_source_surfaces_model_error() {
    let sale = record(json!({"id": "sale-3", "minerals": "not a list"}));
    assert!(CascadeRuleTable::standard().plan(EntityKind::Sale, &sale).is_err());
}

#[test]
fn extractor_cannot_widen_the_declared_fields() {
    let mut table = CascadeRuleTable::new();
    table.register(CascadeRule {
        source: EntityKind::AdvancePayment,
        targets: vec![CascadeTarget::new(
            EntityKind::Supplier,
            "id",
            &["advanceBalance"],
            |payload: &Record| {
                // Hands back far more than the rule copies.
                Ok(vec![
                    Record::new(payload.get_str("/supplier").unwrap_or_default())
                        .with("advanceBalance", 250.0)
                        .with("name", "should not cascade"),
                ])
            },
        )],
    });

    let advance = record(json!({"id": "a-1", "amount": 250.0, "supplier": "sup-1"}));
    let patches = table.plan(EntityKind::AdvancePayment, &advance).unwrap();
    assert_eq!(patches.len(), 1);
    assert_eq!(Value::Object(patches[0].fields.clone()), json!({"advanceBalance": 250.0}));
}

#[test]
fn register_appends_targets_for_same_source() {
    let mut table = CascadeRuleTable::standard();
    table.register(CascadeRule {
        source: EntityKind::Sale,
        targets: vec![CascadeTarget::new(EntityKind::Buyer, "id", &["lastSale"], |_| {
            Ok(Vec::new())
        })],
    });
    assert_eq!(table.rule_for(EntityKind::Sale).unwrap().targets.len(), 4);
}
