//! Quest catalog types.
//!
//! Quests are immutable reference data: the state machine reads them but
//! never writes them. Seeding happens once at startup through the catalog
//! adapter.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{QuestId, SpendingCategory, ValidationError};

/// Cadence of a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestType {
    /// Progress window is one schedule day.
    Daily,
    /// Progress window is one schedule week.
    Weekly,
    /// Progress window is `time_limit_secs` from assignment.
    Timed,
}

/// Difficulty tier, for display and catalog curation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestDifficulty {
    Easy,
    Medium,
    Hard,
}

impl QuestDifficulty {
    /// Human-readable name for display.
    pub fn display_name(&self) -> &'static str {
        match self {
            QuestDifficulty::Easy => "Easy",
            QuestDifficulty::Medium => "Medium",
            QuestDifficulty::Hard => "Hard",
        }
    }
}

/// What spending a quest counts.
///
/// `Any` quests advance from every matching action; `Spending` quests only
/// from expenses in that category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestCategory {
    Any,
    Spending(SpendingCategory),
}

impl QuestCategory {
    /// Whether an event with the given category advances this quest.
    ///
    /// Events without a category (receipt scans) only match `Any` quests.
    pub fn matches(&self, event_category: Option<SpendingCategory>) -> bool {
        match self {
            QuestCategory::Any => true,
            QuestCategory::Spending(wanted) => event_category == Some(*wanted),
        }
    }
}

/// A quest definition from the catalog.
///
/// # Invariants
///
/// - `target >= 1`
/// - `time_limit_secs` is only meaningful for `Timed` quests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: QuestId,
    pub quest_type: QuestType,
    pub title: String,
    pub description: String,
    pub xp_reward: u64,
    pub target: u32,
    pub difficulty: QuestDifficulty,
    pub category: QuestCategory,
    pub time_limit_secs: Option<u64>,
    pub repeatable: bool,
}

impl Quest {
    /// Creates a quest definition, validating the progress target.
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        id: QuestId,
        quest_type: QuestType,
        title: impl Into<String>,
        description: impl Into<String>,
        xp_reward: u64,
        target: u32,
        difficulty: QuestDifficulty,
        category: QuestCategory,
        time_limit_secs: Option<u64>,
        repeatable: bool,
    ) -> Result<Self, ValidationError> {
        if target == 0 {
            return Err(ValidationError::out_of_range(
                "target",
                1,
                i64::from(u32::MAX),
                0,
            ));
        }
        let title = title.into();
        if title.is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        Ok(Self {
            id,
            quest_type,
            title,
            description: description.into(),
            xp_reward,
            target,
            difficulty,
            category,
            time_limit_secs,
            repeatable,
        })
    }
}
