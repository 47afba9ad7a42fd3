//! MemberQuest repository port (write side).
//!
//! MemberQuest rows are keyed by the `(member, quest)` pair. Like member
//! counters, updates are version-checked so two concurrent claims of the
//! same quest cannot both succeed.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MemberId, QuestId};
use crate::domain::quest::MemberQuest;

/// Repository port for MemberQuest progress rows.
#[async_trait]
pub trait MemberQuestRepository: Send + Sync {
    /// Find a member's instance of a quest.
    ///
    /// Returns `None` if the quest was never assigned to the member.
    async fn find(
        &self,
        member_id: &MemberId,
        quest_id: &QuestId,
    ) -> Result<Option<MemberQuest>, DomainError>;

    /// All of a member's in-progress quests.
    async fn list_in_progress(&self, member_id: &MemberId)
        -> Result<Vec<MemberQuest>, DomainError>;

    /// Save a quest instance, replacing any prior instance for the pair.
    ///
    /// Replacement is what makes repeatable quests work: re-assignment
    /// after a claim writes a fresh instance over the claimed one.
    async fn save(&self, member_quest: &MemberQuest) -> Result<(), DomainError>;

    /// Update an existing instance with a version check.
    ///
    /// # Errors
    ///
    /// - `QuestNotFound` if the pair has no instance
    /// - `VersionConflict` if the stored version differs from
    ///   `member_quest.version` (re-read and retry)
    async fn update(&self, member_quest: &MemberQuest) -> Result<(), DomainError>;
}
