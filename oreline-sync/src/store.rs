//! Entity collection store.
//!
//! One keyed collection per entity kind, each with the ids of the page
//! currently on screen (in display order) and the server's pagination
//! window. Every operation is total: absence of a target is a silent,
//! valid outcome.

use oreline_model::Record;
use oreline_types::{EntityId, EntityKind, PaginationWindow};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// How an upsert of a previously unseen entity affects `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertMode {
    /// A genuinely new server-side record (confirmed create, broadcast insert).
    New,
    /// A record the server already counted (fetch by id, update).
    Known,
}

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    /// Prepended to the page.
    Inserted,
    /// Replaced in place, keeping its position.
    Replaced,
}

/// An immutable copy of one collection's page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionSnapshot {
    pub items: Vec<Record>,
    pub window: PaginationWindow,
}

/// Entities of one kind.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    entities: HashMap<EntityId, Record>,
    /// Page order.
    order: Vec<EntityId>,
    window: PaginationWindow,
}

impl Collection {
    /// Creates an empty collection on page 1.
    pub fn new(limit: u32) -> Self {
        Self {
            entities: HashMap::new(),
            order: Vec::new(),
            window: PaginationWindow::first_page(limit),
        }
    }

    pub fn get(&self, id: &EntityId) -> Option<&Record> {
        self.entities.get(id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn window(&self) -> PaginationWindow {
        self.window
    }

    /// Ids in page order.
    pub fn ids(&self) -> &[EntityId] {
        &self.order
    }

    /// Records in page order.
    pub fn page(&self) -> Vec<Record> {
        self.order
            .iter()
            .filter_map(|id| self.entities.get(id))
            .cloned()
            .collect()
    }

    pub fn snapshot(&self) -> CollectionSnapshot {
        CollectionSnapshot {
            items: self.page(),
            window: self.window,
        }
    }

    /// Replaces an existing record in place, or prepends a new one.
    ///
    /// `total` grows only when a previously unseen record is inserted with
    /// [`InsertMode::New`].
    pub fn upsert(&mut self, record: Record, mode: InsertMode) -> UpsertOutcome {
        if let Some(existing) = self.entities.get_mut(&record.id) {
            *existing = record;
            return UpsertOutcome::Replaced;
        }
        self.order.insert(0, record.id.clone());
        self.entities.insert(record.id.clone(), record);
        if mode == InsertMode::New {
            self.window.increment_total();
        }
        UpsertOutcome::Inserted
    }

    /// Merges `partial` onto the record at `id`. Returns false if absent.
    pub fn patch(&mut self, id: &EntityId, partial: &Map<String, Value>) -> bool {
        match self.entities.get_mut(id) {
            Some(record) => {
                record.merge(partial);
                true
            }
            None => false,
        }
    }

    /// Merges `partial` onto every record whose `field` equals `value`.
    /// Returns the number of records matched.
    pub fn patch_matching(
        &mut self,
        field: &str,
        value: &Value,
        partial: &Map<String, Value>,
    ) -> usize {
        if field == "id" {
            return match value.as_str() {
                Some(id) => usize::from(self.patch(&EntityId::from(id), partial)),
                None => 0,
            };
        }
        let mut matched = 0;
        for record in self.entities.values_mut() {
            if record.fields.get(field) == Some(value) {
                record.merge(partial);
                matched += 1;
            }
        }
        matched
    }

    /// Removes a held record and decrements `total`. No-op if absent.
    pub fn remove(&mut self, id: &EntityId) -> bool {
        if self.take(id) {
            self.window.decrement_total();
            true
        } else {
            false
        }
    }

    /// Applies a server-confirmed delete: drops the id if held and
    /// decrements `total` once either way. Returns whether it was held.
    pub fn record_deletion(&mut self, id: &EntityId) -> bool {
        let held = self.take(id);
        self.window.decrement_total();
        held
    }

    fn take(&mut self, id: &EntityId) -> bool {
        if self.entities.remove(id).is_none() {
            return false;
        }
        self.order.retain(|held| held != id);
        true
    }

    /// Replaces the page wholesale after a fetch or search.
    pub fn replace_page(&mut self, records: Vec<Record>, window: PaginationWindow) {
        self.entities.clear();
        self.order.clear();
        for record in records {
            if self.entities.contains_key(&record.id) {
                continue;
            }
            self.order.push(record.id.clone());
            self.entities.insert(record.id.clone(), record);
        }
        self.window = window;
    }

    /// Empties the collection, keeping its limit.
    pub fn clear(&mut self) {
        *self = Self::new(self.window.limit);
    }
}

/// All collections of a session.
#[derive(Debug, Clone)]
pub struct Collections {
    by_kind: HashMap<EntityKind, Collection>,
    default_limit: u32,
}

impl Collections {
    /// Creates one empty collection per known kind.
    pub fn new(default_limit: u32) -> Self {
        let by_kind = EntityKind::ALL
            .into_iter()
            .map(|kind| (kind, Collection::new(default_limit)))
            .collect();
        Self {
            by_kind,
            default_limit,
        }
    }

    pub fn get(&self, kind: EntityKind) -> Option<&Collection> {
        self.by_kind.get(&kind)
    }

    fn collection_mut(&mut self, kind: EntityKind) -> &mut Collection {
        let limit = self.default_limit;
        self.by_kind
            .entry(kind)
            .or_insert_with(|| Collection::new(limit))
    }

    pub fn upsert(&mut self, kind: EntityKind, record: Record, mode: InsertMode) -> UpsertOutcome {
        self.collection_mut(kind).upsert(record, mode)
    }

    pub fn patch(&mut self, kind: EntityKind, id: &EntityId, partial: &Map<String, Value>) -> bool {
        self.collection_mut(kind).patch(id, partial)
    }

    pub fn patch_matching(
        &mut self,
        kind: EntityKind,
        field: &str,
        value: &Value,
        partial: &Map<String, Value>,
    ) -> usize {
        self.collection_mut(kind).patch_matching(field, value, partial)
    }

    pub fn remove(&mut self, kind: EntityKind, id: &EntityId) -> bool {
        self.collection_mut(kind).remove(id)
    }

    pub fn record_deletion(&mut self, kind: EntityKind, id: &EntityId) -> bool {
        self.collection_mut(kind).record_deletion(id)
    }

    pub fn replace_page(&mut self, kind: EntityKind, records: Vec<Record>, window: PaginationWindow) {
        self.collection_mut(kind).replace_page(records, window);
    }

    /// Session teardown: every collection back to empty.
    pub fn clear(&mut self) {
        for collection in self.by_kind.values_mut() {
            collection.clear();
        }
    }
}

impl Default for Collections {
    fn default() -> Self {
        Self::new(PaginationWindow::default().limit)
    }
}
