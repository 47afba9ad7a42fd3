//! In-memory quest catalog with the default seed.
//!
//! The catalog is reference data initialized once; runtime code only
//! reads it. Seed quests use fixed UUIDs so re-seeding is stable across
//! runs and environments.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use uuid::uuid;

use crate::domain::foundation::{DomainError, QuestId, SpendingCategory};
use crate::domain::quest::{Quest, QuestCategory, QuestDifficulty, QuestType};
use crate::ports::QuestCatalog;

/// Default quest catalog seed.
pub static DEFAULT_QUESTS: Lazy<Vec<Quest>> = Lazy::new(|| {
    vec![
        Quest::try_new(
            QuestId::from_uuid(uuid!("0191f1a0-0000-7000-8000-000000000001")),
            QuestType::Daily,
            "Penny Counter",
            "Log three expenses today",
            30,
            3,
            QuestDifficulty::Easy,
            QuestCategory::Any,
            None,
            true,
        )
        .expect("default quest catalog entry is valid"),
        Quest::try_new(
            QuestId::from_uuid(uuid!("0191f1a0-0000-7000-8000-000000000002")),
            QuestType::Daily,
            "Paper Trail",
            "Scan a receipt today",
            20,
            1,
            QuestDifficulty::Easy,
            QuestCategory::Any,
            None,
            true,
        )
        .expect("default quest catalog entry is valid"),
        Quest::try_new(
            QuestId::from_uuid(uuid!("0191f1a0-0000-7000-8000-000000000003")),
            QuestType::Weekly,
            "Pantry Planner",
            "Log five grocery expenses this week",
            80,
            5,
            QuestDifficulty::Medium,
            QuestCategory::Spending(SpendingCategory::Groceries),
            None,
            true,
        )
        .expect("default quest catalog entry is valid"),
        Quest::try_new(
            QuestId::from_uuid(uuid!("0191f1a0-0000-7000-8000-000000000004")),
            QuestType::Weekly,
            "Full Ledger",
            "Log ten expenses this week",
            100,
            10,
            QuestDifficulty::Hard,
            QuestCategory::Any,
            None,
            true,
        )
        .expect("default quest catalog entry is valid"),
        Quest::try_new(
            QuestId::from_uuid(uuid!("0191f1a0-0000-7000-8000-000000000005")),
            QuestType::Timed,
            "Receipt Rush",
            "Scan two receipts within an hour",
            60,
            2,
            QuestDifficulty::Medium,
            QuestCategory::Any,
            Some(3600),
            false,
        )
        .expect("default quest catalog entry is valid"),
    ]
});

/// In-memory quest catalog.
///
/// Built once at startup and read-only afterwards, so no interior
/// mutability is needed.
pub struct InMemoryQuestCatalog {
    quests: HashMap<QuestId, Quest>,
}

impl InMemoryQuestCatalog {
    /// Creates a catalog holding the given quests.
    pub fn with_quests(quests: Vec<Quest>) -> Self {
        Self {
            quests: quests.into_iter().map(|q| (q.id, q)).collect(),
        }
    }

    /// Creates a catalog seeded with the default quests.
    pub fn seeded() -> Self {
        Self::with_quests(DEFAULT_QUESTS.clone())
    }
}

#[async_trait]
impl QuestCatalog for InMemoryQuestCatalog {
    async fn get_by_id(&self, id: &QuestId) -> Result<Option<Quest>, DomainError> {
        Ok(self.quests.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Quest>, DomainError> {
        Ok(self.quests.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeded_catalog_lists_default_quests() {
        let catalog = InMemoryQuestCatalog::seeded();
        let quests = catalog.list().await.unwrap();
        assert_eq!(quests.len(), DEFAULT_QUESTS.len());
    }

    #[tokio::test]
    async fn get_by_id_finds_seeded_quest() {
        let catalog = InMemoryQuestCatalog::seeded();
        let wanted = &DEFAULT_QUESTS[0];

        let quest = catalog.get_by_id(&wanted.id).await.unwrap();
        assert_eq!(quest.as_ref().map(|q| &q.title), Some(&wanted.title));
    }

    #[tokio::test]
    async fn get_by_id_returns_none_for_unknown_quest() {
        let catalog = InMemoryQuestCatalog::seeded();
        let quest = catalog.get_by_id(&QuestId::new()).await.unwrap();
        assert!(quest.is_none());
    }

    #[test]
    fn default_quests_have_stable_unique_ids() {
        let mut ids: Vec<QuestId> = DEFAULT_QUESTS.iter().map(|q| q.id).collect();
        ids.sort_by_key(|id| id.to_string());
        ids.dedup();
        assert_eq!(ids.len(), DEFAULT_QUESTS.len());
    }

    #[test]
    fn timed_default_quest_carries_a_limit() {
        let timed = DEFAULT_QUESTS
            .iter()
            .find(|q| q.quest_type == QuestType::Timed)
            .unwrap();
        assert!(timed.time_limit_secs.is_some());
    }
}
