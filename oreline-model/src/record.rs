use crate::{ModelError, ModelResult};
use oreline_types::EntityId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored entity: a stable id plus an arbitrary set of fields.
///
/// Serializes as one flat JSON object, the shape the API and the
/// real-time channel use. Records are replaced wholesale except for
/// cascade patches, which go through [`Record::merge`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: EntityId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Creates a record with no fields besides its id.
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Builds a record from a JSON object carrying a non-empty string `id`.
    pub fn from_value(value: Value) -> ModelResult<Self> {
        let Value::Object(mut fields) = value else {
            return Err(ModelError::NotAnObject);
        };
        let id = match fields.remove("id") {
            Some(Value::String(id)) if !id.is_empty() => EntityId::from(id),
            _ => return Err(ModelError::MissingId),
        };
        Ok(Self { id, fields })
    }

    /// Returns the flat JSON object form.
    pub fn to_value(&self) -> Value {
        let mut object = Map::with_capacity(self.fields.len() + 1);
        object.insert("id".to_string(), Value::String(self.id.to_string()));
        for (key, value) in &self.fields {
            object.insert(key.clone(), value.clone());
        }
        Value::Object(object)
    }

    /// Builder-style field setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Looks up a top-level field. `"id"` resolves to the record id.
    pub fn field(&self, name: &str) -> Option<Value> {
        if name == "id" {
            return Some(Value::String(self.id.to_string()));
        }
        self.fields.get(name).cloned()
    }

    /// Extract a string value using a JSON pointer (e.g., "/supplier/name").
    pub fn get_str(&self, pointer: &str) -> Option<&str> {
        self.pointer(pointer).and_then(|v| v.as_str())
    }

    /// Extract a boolean value using a JSON pointer.
    pub fn get_bool(&self, pointer: &str) -> Option<bool> {
        self.pointer(pointer).and_then(|v| v.as_bool())
    }

    /// Extract a numeric value using a JSON pointer.
    pub fn get_number(&self, pointer: &str) -> Option<f64> {
        self.pointer(pointer).and_then(|v| v.as_f64())
    }

    fn pointer(&self, pointer: &str) -> Option<&Value> {
        let rest = pointer.strip_prefix('/')?;
        let (head, tail) = match rest.split_once('/') {
            Some((head, tail)) => (head, Some(tail)),
            None => (rest, None),
        };
        let value = self.fields.get(head)?;
        match tail {
            Some(tail) => value.pointer(&format!("/{tail}")),
            None => Some(value),
        }
    }

    /// Merges `partial` onto this record, top-level keys only.
    ///
    /// Fields absent from `partial` are left untouched and `id` is never
    /// rewritten. Returns true if any field changed.
    pub fn merge(&mut self, partial: &Map<String, Value>) -> bool {
        let mut changed = false;
        for (key, value) in partial {
            if key == "id" {
                continue;
            }
            if self.fields.get(key) != Some(value) {
                self.fields.insert(key.clone(), value.clone());
                changed = true;
            }
        }
        changed
    }

    /// Returns only the named fields this record actually carries.
    pub fn project(&self, names: &[&str]) -> Map<String, Value> {
        names
            .iter()
            .filter_map(|name| {
                self.fields
                    .get(*name)
                    .map(|value| ((*name).to_string(), value.clone()))
            })
            .collect()
    }

    /// Decodes this record into a typed shape.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_value())
    }
}
