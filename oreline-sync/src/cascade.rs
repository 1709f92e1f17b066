//! Cascade rule table.
//!
//! Some entities embed copies of others: a sale carries the status of every
//! stock lot it sold from, a payment carries the settlement of every lot it
//! paid for. When such an entity changes, the embedded copies are patched
//! into the collections that own them.
//!
//! Every fan-out relationship is declared here, in one table. A target
//! names exactly the fields it copies; the extracted snapshot is projected
//! onto that subset before any patch is applied, so a rule can never turn
//! into a full-entity replace of its target.

use oreline_model::{KindRecord, ModelResult, Payment, Record, Sale};
use oreline_types::{EntityKind, MineralCategory};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Pulls embedded entity snapshots out of a source payload.
pub type Extractor = Arc<dyn Fn(&Record) -> ModelResult<Vec<Record>> + Send + Sync>;

/// Fields a sale copies into the stock lots it sold from.
pub const SALE_ITEM_FIELDS: &[&str] = &["status"];

/// Fields a payment copies into the stock lots it settled.
pub const PAYMENT_ITEM_FIELDS: &[&str] = &["paid", "paymentStatus"];

/// One destination of a cascade.
#[derive(Clone)]
pub struct CascadeTarget {
    pub target: EntityKind,
    /// Field identifying the target entity (normally `id`).
    pub match_field: &'static str,
    /// The only fields copied into the target.
    pub fields: &'static [&'static str],
    extract: Extractor,
}

impl CascadeTarget {
    pub fn new<F>(
        target: EntityKind,
        match_field: &'static str,
        fields: &'static [&'static str],
        extract: F,
    ) -> Self
    where
        F: Fn(&Record) -> ModelResult<Vec<Record>> + Send + Sync + 'static,
    {
        Self {
            target,
            match_field,
            fields,
            extract: Arc::new(extract),
        }
    }

    /// Extracts the patches this target receives from `payload`.
    ///
    /// Snapshots without a match value, or carrying none of the declared
    /// fields, yield no patch.
    pub fn patches(&self, payload: &Record) -> ModelResult<Vec<CascadePatch>> {
        let snapshots = (self.extract)(payload)?;
        let mut patches = Vec::with_capacity(snapshots.len());
        for snapshot in snapshots {
            let Some(match_value) = snapshot.field(self.match_field) else {
                warn!(
                    "Cascade snapshot for {} lacks match field {}",
                    self.target, self.match_field
                );
                continue;
            };
            let fields = snapshot.project(self.fields);
            if fields.is_empty() {
                continue;
            }
            patches.push(CascadePatch {
                target: self.target,
                match_field: self.match_field,
                match_value,
                fields,
            });
        }
        Ok(patches)
    }
}

impl fmt::Debug for CascadeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CascadeTarget")
            .field("target", &self.target)
            .field("match_field", &self.match_field)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// A partial update bound for one target collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadePatch {
    pub target: EntityKind,
    pub match_field: &'static str,
    pub match_value: Value,
    pub fields: Map<String, Value>,
}

/// All fan-out targets of one source kind.
#[derive(Debug, Clone)]
pub struct CascadeRule {
    pub source: EntityKind,
    pub targets: Vec<CascadeTarget>,
}

/// The declarative table of cross-collection effects.
#[derive(Debug, Clone, Default)]
pub struct CascadeRuleTable {
    rules: HashMap<EntityKind, CascadeRule>,
}

impl CascadeRuleTable {
    /// An empty table: no entity fans out.
    pub fn new() -> Self {
        Self::default()
    }

    /// The rules of the trading dashboard:
    /// - `sale` patches `status` into the lot of each line item, in the
    ///   collection of the item's mineral category
    /// - `payment` patches `paid` and `paymentStatus` into the lots listed
    ///   in each of its three per-category arrays
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.register(CascadeRule {
            source: EntityKind::Sale,
            targets: MineralCategory::ALL
                .into_iter()
                .map(|category| {
                    CascadeTarget::new(category.kind(), "id", SALE_ITEM_FIELDS, move |payload| {
                        sale_items(payload, category)
                    })
                })
                .collect(),
        });
        table.register(CascadeRule {
            source: EntityKind::Payment,
            targets: MineralCategory::ALL
                .into_iter()
                .map(|category| {
                    CascadeTarget::new(category.kind(), "id", PAYMENT_ITEM_FIELDS, move |payload| {
                        payment_items(payload, category)
                    })
                })
                .collect(),
        });
        table
    }

    /// Adds a rule. Targets of an already registered source are appended.
    pub fn register(&mut self, rule: CascadeRule) {
        match self.rules.get_mut(&rule.source) {
            Some(existing) => existing.targets.extend(rule.targets),
            None => {
                self.rules.insert(rule.source, rule);
            }
        }
    }

    pub fn rule_for(&self, source: EntityKind) -> Option<&CascadeRule> {
        self.rules.get(&source)
    }

    /// Source kinds that fan out, sorted.
    pub fn sources(&self) -> Vec<EntityKind> {
        let mut sources: Vec<_> = self.rules.keys().copied().collect();
        sources.sort();
        sources
    }

    /// Every patch a payload of `source` produces, across all targets.
    pub fn plan(&self, source: EntityKind, payload: &Record) -> ModelResult<Vec<CascadePatch>> {
        let Some(rule) = self.rules.get(&source) else {
            return Ok(Vec::new());
        };
        let mut patches = Vec::new();
        for target in &rule.targets {
            patches.extend(target.patches(payload)?);
        }
        Ok(patches)
    }
}

/// Line items of `category`, exactly as the sale payload carries them.
fn sale_items(payload: &Record, category: MineralCategory) -> ModelResult<Vec<Record>> {
    let sale = Sale::from_record(EntityKind::Sale, payload)?;
    sale.minerals
        .iter()
        .zip(embedded(payload, "minerals"))
        .filter(|(item, _)| item.mineral_type == category)
        .map(|(_, raw)| Record::from_value(raw.clone()))
        .collect()
}

/// Settled lots of `category`, exactly as the payment payload carries them.
fn payment_items(payload: &Record, category: MineralCategory) -> ModelResult<Vec<Record>> {
    Payment::from_record(EntityKind::Payment, payload)?;
    embedded(payload, category.as_str())
        .iter()
        .map(|item| Record::from_value(item.clone()))
        .collect()
}

/// The raw array under `field`; decoding has already checked its items.
fn embedded<'a>(payload: &'a Record, field: &str) -> &'a [Value] {
    payload
        .fields
        .get(field)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}
