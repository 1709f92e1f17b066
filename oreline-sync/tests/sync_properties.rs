//! Property-based tests for broadcast reconciliation.
//!
//! - Idempotence: delivering a message N times equals delivering it once
//! - Arrival order: for one entity, the last message applied wins
//! - Cascades never touch fields outside their declared subset

use oreline_model::Record;
use oreline_sync::{BroadcastReconciler, CascadeRuleTable, Collections, InsertMode};
use oreline_types::{EntityId, EntityKind, UserId};
use proptest::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z ]{1,24}").unwrap()
}

fn id_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]{1,12}").unwrap()
}

fn status_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["in stock", "sold", "partially sold", "exported"])
        .prop_map(str::to_string)
}

fn reconciler() -> BroadcastReconciler {
    BroadcastReconciler::new(
        UserId::from("local"),
        Arc::new(CascadeRuleTable::standard()),
    )
}

fn buyer_message(id: &str, name: &str) -> Value {
    json!({
        "kind": "buyer",
        "payload": {"id": id, "name": name},
        "originatorId": "remote"
    })
}

// =============================================================================
// RECONCILIATION PROPERTIES
// =============================================================================

proptest! {
    /// Applying the same message N times leaves the store as applying it once.
    #[test]
    fn redelivery_is_idempotent(
        id in id_strategy(),
        name in name_strategy(),
        deliveries in 1usize..8,
    ) {
        let reconciler = reconciler();
        let mut once = Collections::default();
        let mut many = Collections::default();

        reconciler.reconcile_value(buyer_message(&id, &name), &mut once);
        for _ in 0..deliveries {
            reconciler.reconcile_value(buyer_message(&id, &name), &mut many);
        }

        let once = once.get(EntityKind::Buyer).unwrap().snapshot();
        let many = many.get(EntityKind::Buyer).unwrap().snapshot();
        prop_assert_eq!(&once, &many);
        prop_assert_eq!(many.window.total, 1);
        prop_assert_eq!(many.items.len(), 1);
    }

    /// A sequence of updates to one entity converges to the last one.
    #[test]
    fn last_applied_message_wins(
        id in id_strategy(),
        names in prop::collection::vec(name_strategy(), 1..10),
    ) {
        let reconciler = reconciler();
        let mut collections = Collections::default();

        for name in &names {
            reconciler.reconcile_value(buyer_message(&id, name), &mut collections);
        }

        let buyers = collections.get(EntityKind::Buyer).unwrap();
        let held = buyers.get(&EntityId::from(id.as_str())).unwrap();
        prop_assert_eq!(held.get_str("/name"), names.last().map(String::as_str));
        prop_assert_eq!(buyers.window().total, 1);
    }

    /// Distinct entities each count once, newest first.
    #[test]
    fn distinct_entities_prepend_in_arrival_order(
        ids in prop::collection::hash_set(id_strategy(), 1..12),
    ) {
        let reconciler = reconciler();
        let mut collections = Collections::default();
        let ids: Vec<String> = ids.into_iter().collect();

        for id in &ids {
            reconciler.reconcile_value(buyer_message(id, "Buyer"), &mut collections);
        }

        let buyers = collections.get(EntityKind::Buyer).unwrap();
        let held: Vec<&str> = buyers.ids().iter().map(EntityId::as_str).collect();
        let expected: Vec<&str> = ids.iter().rev().map(String::as_str).collect();
        prop_assert_eq!(held, expected);
        prop_assert_eq!(buyers.window().total, ids.len() as u64);
    }

    /// A sale cascade only ever writes `status` into its target lot.
    #[test]
    fn sale_cascade_touches_only_status(
        status in status_strategy(),
        weight in 0.5f64..500.0,
        supplier in name_strategy(),
    ) {
        let reconciler = reconciler();
        let mut collections = Collections::default();
        collections.upsert(
            EntityKind::Cassiterite,
            Record::new("cas-1")
                .with("status", "in stock")
                .with("weightIn", weight)
                .with("supplier", supplier.as_str()),
            InsertMode::New,
        );

        reconciler.reconcile_value(
            json!({
                "kind": "sale",
                "payload": {
                    "id": "sale-1",
                    "minerals": [{
                        "id": "cas-1",
                        "mineralType": "cassiterite",
                        "status": status,
                        "weight": 1.0
                    }]
                },
                "originatorId": "remote"
            }),
            &mut collections,
        );

        let lots = collections.get(EntityKind::Cassiterite).unwrap();
        let lot = lots.get(&EntityId::from("cas-1")).unwrap();
        prop_assert_eq!(
            lot.to_value(),
            json!({"id": "cas-1", "status": status, "weightIn": weight, "supplier": supplier})
        );
        prop_assert_eq!(lots.window().total, 1);
    }
}
