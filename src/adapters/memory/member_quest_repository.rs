//! In-memory member quest repository with optimistic concurrency.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, MemberId, QuestId};
use crate::domain::quest::{MemberQuest, QuestStatus};
use crate::ports::MemberQuestRepository;

/// In-memory MemberQuest store, keyed by `(member, quest)`.
///
/// `save` replaces any prior instance for the pair (repeatable
/// re-assignment); `update` enforces the version check.
pub struct InMemoryMemberQuestRepository {
    member_quests: RwLock<HashMap<(MemberId, QuestId), MemberQuest>>,
}

impl InMemoryMemberQuestRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            member_quests: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryMemberQuestRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemberQuestRepository for InMemoryMemberQuestRepository {
    async fn find(
        &self,
        member_id: &MemberId,
        quest_id: &QuestId,
    ) -> Result<Option<MemberQuest>, DomainError> {
        let member_quests = self
            .member_quests
            .read()
            .expect("InMemoryMemberQuestRepository: lock poisoned");
        Ok(member_quests.get(&(*member_id, *quest_id)).cloned())
    }

    async fn list_in_progress(
        &self,
        member_id: &MemberId,
    ) -> Result<Vec<MemberQuest>, DomainError> {
        let member_quests = self
            .member_quests
            .read()
            .expect("InMemoryMemberQuestRepository: lock poisoned");
        Ok(member_quests
            .values()
            .filter(|mq| mq.member_id == *member_id && mq.status == QuestStatus::InProgress)
            .cloned()
            .collect())
    }

    async fn save(&self, member_quest: &MemberQuest) -> Result<(), DomainError> {
        let mut member_quests = self
            .member_quests
            .write()
            .expect("InMemoryMemberQuestRepository: lock poisoned");
        member_quests.insert(
            (member_quest.member_id, member_quest.quest_id),
            member_quest.clone(),
        );
        Ok(())
    }

    async fn update(&self, member_quest: &MemberQuest) -> Result<(), DomainError> {
        let key = (member_quest.member_id, member_quest.quest_id);
        let mut member_quests = self
            .member_quests
            .write()
            .expect("InMemoryMemberQuestRepository: lock poisoned");
        match member_quests.get(&key) {
            None => Err(DomainError::new(
                ErrorCode::QuestNotFound,
                format!(
                    "No quest instance for member {} and quest {}",
                    member_quest.member_id, member_quest.quest_id
                ),
            )),
            Some(stored) if stored.version != member_quest.version => {
                Err(DomainError::version_conflict(format!(
                    "Quest instance for member {} was updated concurrently",
                    member_quest.member_id
                )))
            }
            Some(_) => {
                let mut updated = member_quest.clone();
                updated.version += 1;
                member_quests.insert(key, updated);
                Ok(())
            }
        }
    }
}
