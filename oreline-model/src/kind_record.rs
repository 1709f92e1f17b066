use crate::records::{
    AdvancePayment, Buyer, Expense, ExpenseType, MineralLot, Payment, Sale, Settings, Supplier,
};
use crate::{ModelError, ModelResult, Record};
use oreline_types::EntityKind;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A typed record shape for one or more entity kinds.
pub trait KindRecord: Serialize + DeserializeOwned {
    /// Decodes a stored record of `kind` into this shape.
    fn from_record(kind: EntityKind, record: &Record) -> ModelResult<Self> {
        record
            .decode()
            .map_err(|source| ModelError::InvalidPayload { kind, source })
    }

    /// Encodes this shape back into a storable record.
    fn to_record(&self) -> ModelResult<Record> {
        Record::from_value(serde_json::to_value(self)?)
    }
}

macro_rules! kind_record {
    ($($ty:ty),* $(,)?) => {
        $(
            impl KindRecord for $ty {}
        )*
    };
}

kind_record!(
    Supplier,
    Buyer,
    Sale,
    Payment,
    Expense,
    ExpenseType,
    AdvancePayment,
    Settings,
    MineralLot,
);

/// Type-checks a payload against the record shape registered for `kind`.
///
/// This is the one registration point for record shapes: a new kind gets
/// one arm here.
pub fn validate(kind: EntityKind, record: &Record) -> ModelResult<()> {
    match kind {
        EntityKind::Supplier => Supplier::from_record(kind, record).map(drop),
        EntityKind::Buyer => Buyer::from_record(kind, record).map(drop),
        EntityKind::Sale => Sale::from_record(kind, record).map(drop),
        EntityKind::Payment => Payment::from_record(kind, record).map(drop),
        EntityKind::Expense => Expense::from_record(kind, record).map(drop),
        EntityKind::ExpenseType => ExpenseType::from_record(kind, record).map(drop),
        EntityKind::AdvancePayment => AdvancePayment::from_record(kind, record).map(drop),
        EntityKind::Settings => Settings::from_record(kind, record).map(drop),
        EntityKind::Cassiterite | EntityKind::Coltan | EntityKind::Wolframite => {
            MineralLot::from_record(kind, record).map(drop)
        }
    }
}
