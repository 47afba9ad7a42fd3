//! Spending category vocabulary shared by expenses and quests.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Spending category attached to expenses and receipt-derived charges.
///
/// Quests may target a single category; `Other` is the catch-all for
/// uncategorized spending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendingCategory {
    Groceries,
    Dining,
    Transport,
    Utilities,
    Entertainment,
    Health,
    Shopping,
    Other,
}

impl SpendingCategory {
    /// Human-readable name for display.
    pub fn display_name(&self) -> &'static str {
        match self {
            SpendingCategory::Groceries => "Groceries",
            SpendingCategory::Dining => "Dining",
            SpendingCategory::Transport => "Transport",
            SpendingCategory::Utilities => "Utilities",
            SpendingCategory::Entertainment => "Entertainment",
            SpendingCategory::Health => "Health",
            SpendingCategory::Shopping => "Shopping",
            SpendingCategory::Other => "Other",
        }
    }
}

impl fmt::Display for SpendingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
