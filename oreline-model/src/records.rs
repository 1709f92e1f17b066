//! Typed record shapes, one per entity kind.
//!
//! Field names follow the API's camelCase JSON. Unknown fields are
//! tolerated so the server can add fields without breaking older clients.
//! Only ids, sale line items and payment settlement arrays are checked
//! strictly; the sync core routes cascades by them. Every other field is
//! decoded leniently and reads as `None` when its value has another shape.

use crate::lenient;
use chrono::{DateTime, Utc};
use oreline_types::{EntityId, MineralCategory};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: EntityId,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buyer {
    pub id: EntityId,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub country: Option<String>,
}

/// A sale of mineral stock to a buyer.
///
/// Each line item references a stock lot in the collection of its
/// mineral category and carries the lot's status after the sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: EntityId,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub buyer: Option<EntityId>,
    #[serde(default)]
    pub minerals: Vec<SaleItem>,
    #[serde(
        default,
        deserialize_with = "lenient::date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<DateTime<Utc>>,
}

impl Sale {
    /// Line items of one mineral category.
    pub fn items_of(&self, category: MineralCategory) -> impl Iterator<Item = &SaleItem> {
        self.minerals
            .iter()
            .filter(move |item| item.mineral_type == category)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    /// Id of the stock lot this item sells from.
    pub id: EntityId,
    pub mineral_type: MineralCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<f64>,
}

/// A payment to a supplier, settling stock lots of up to three categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: EntityId,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub supplier: Option<EntityId>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<f64>,
    #[serde(default)]
    pub cassiterite: Vec<PaymentItem>,
    #[serde(default)]
    pub coltan: Vec<PaymentItem>,
    #[serde(default)]
    pub wolframite: Vec<PaymentItem>,
    #[serde(
        default,
        deserialize_with = "lenient::date",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_date: Option<DateTime<Utc>>,
}

impl Payment {
    /// The settled lots of one mineral category.
    pub fn items_of(&self, category: MineralCategory) -> &[PaymentItem] {
        match category {
            MineralCategory::Cassiterite => &self.cassiterite,
            MineralCategory::Coltan => &self.coltan,
            MineralCategory::Wolframite => &self.wolframite,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentItem {
    /// Id of the settled stock lot.
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: EntityId,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expense_type: Option<EntityId>,
    #[serde(
        default,
        deserialize_with = "lenient::date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseType {
    pub id: EntityId,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

/// Money advanced to a supplier ahead of deliveries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancePayment {
    pub id: EntityId,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub supplier: Option<EntityId>,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub currency: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::date",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_date: Option<DateTime<Utc>>,
}

/// Company-wide settings (one record per settings group).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub id: EntityId,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub company_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub currency: Option<String>,
}

/// A stock lot received from a supplier; the entity shape of the
/// cassiterite, coltan and wolframite collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MineralLot {
    pub id: EntityId,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub supplier: Option<EntityId>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight_in: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub paid: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_status: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::date",
        skip_serializing_if = "Option::is_none"
    )]
    pub supply_date: Option<DateTime<Utc>>,
}
