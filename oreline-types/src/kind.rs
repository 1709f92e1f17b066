//! The closed vocabulary of entity kinds.
//!
//! Every collection held client-side corresponds to exactly one
//! [`EntityKind`], and the `kind` string of a broadcast message names one of
//! them. Adding a kind means adding a variant here; the compiler then points
//! at every match that must learn about it.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A kind of entity, and the collection that holds entities of that kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Supplier,
    Buyer,
    Sale,
    Payment,
    Expense,
    ExpenseType,
    AdvancePayment,
    Settings,
    /// Cassiterite stock lots.
    Cassiterite,
    /// Coltan stock lots.
    Coltan,
    /// Wolframite stock lots.
    Wolframite,
}

impl EntityKind {
    /// All known kinds, in a stable order.
    pub const ALL: [EntityKind; 11] = [
        EntityKind::Supplier,
        EntityKind::Buyer,
        EntityKind::Sale,
        EntityKind::Payment,
        EntityKind::Expense,
        EntityKind::ExpenseType,
        EntityKind::AdvancePayment,
        EntityKind::Settings,
        EntityKind::Cassiterite,
        EntityKind::Coltan,
        EntityKind::Wolframite,
    ];

    /// The wire name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EntityKind::Supplier => "supplier",
            EntityKind::Buyer => "buyer",
            EntityKind::Sale => "sale",
            EntityKind::Payment => "payment",
            EntityKind::Expense => "expense",
            EntityKind::ExpenseType => "expense_type",
            EntityKind::AdvancePayment => "advance_payment",
            EntityKind::Settings => "settings",
            EntityKind::Cassiterite => "cassiterite",
            EntityKind::Coltan => "coltan",
            EntityKind::Wolframite => "wolframite",
        }
    }

    /// Returns the mineral category whose stock lots this collection holds.
    #[must_use]
    pub const fn mineral_category(self) -> Option<MineralCategory> {
        match self {
            EntityKind::Cassiterite => Some(MineralCategory::Cassiterite),
            EntityKind::Coltan => Some(MineralCategory::Coltan),
            EntityKind::Wolframite => Some(MineralCategory::Wolframite),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownKind(s.to_string()))
    }
}

/// One of the three mutually exclusive mineral categories traded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MineralCategory {
    Cassiterite,
    Coltan,
    Wolframite,
}

impl MineralCategory {
    /// All categories, in a stable order.
    pub const ALL: [MineralCategory; 3] = [
        MineralCategory::Cassiterite,
        MineralCategory::Coltan,
        MineralCategory::Wolframite,
    ];

    /// The collection holding this category's stock lots.
    #[must_use]
    pub const fn kind(self) -> EntityKind {
        match self {
            MineralCategory::Cassiterite => EntityKind::Cassiterite,
            MineralCategory::Coltan => EntityKind::Coltan,
            MineralCategory::Wolframite => EntityKind::Wolframite,
        }
    }

    /// The wire name of this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.kind().as_str()
    }
}

impl fmt::Display for MineralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MineralCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MineralCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}
