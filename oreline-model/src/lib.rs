//! Entity model for the Oreline synchronization core.
//!
//! Defines the types every collection and every broadcast payload share:
//! - [`Record`]: the stored entity (opaque id plus a flat JSON field map)
//! - typed records ([`Sale`], [`Payment`], [`MineralLot`], ...): one per
//!   entity kind, used to type-check payloads before they reach a collection
//! - [`KindRecord`] / [`validate`]: the single place mapping an
//!   [`EntityKind`](oreline_types::EntityKind) to its record shape

mod error;
mod kind_record;
mod lenient;
mod record;
mod records;

pub use error::{ModelError, ModelResult};
pub use kind_record::{validate, KindRecord};
pub use record::Record;
pub use records::{
    AdvancePayment, Buyer, Expense, ExpenseType, MineralLot, Payment, PaymentItem, Sale,
    SaleItem, Settings, Supplier,
};
