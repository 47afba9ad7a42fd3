//! AssignQuestHandler - Command handler for assigning a quest to a member.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::{EventId, MemberId, QuestId, SerializableDomainEvent, Timestamp};
use crate::domain::quest::{MemberQuest, QuestAssigned, QuestError};
use crate::ports::{EventPublisher, MemberQuestRepository, MemberRepository, QuestCatalog};

/// Command to assign a quest to a member.
#[derive(Debug, Clone)]
pub struct AssignQuestCommand {
    pub member_id: MemberId,
    pub quest_id: QuestId,
}

/// Handler for assigning quests.
///
/// A pair can hold at most one live instance. Repeatable quests may be
/// re-assigned after a claim, which writes a fresh instance (progress 0)
/// over the claimed one; any other existing instance is a conflict.
pub struct AssignQuestHandler {
    member_quests: Arc<dyn MemberQuestRepository>,
    members: Arc<dyn MemberRepository>,
    catalog: Arc<dyn QuestCatalog>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl AssignQuestHandler {
    pub fn new(
        member_quests: Arc<dyn MemberQuestRepository>,
        members: Arc<dyn MemberRepository>,
        catalog: Arc<dyn QuestCatalog>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            member_quests,
            members,
            catalog,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: AssignQuestCommand) -> Result<MemberQuest, QuestError> {
        let quest = self
            .catalog
            .get_by_id(&cmd.quest_id)
            .await?
            .ok_or(QuestError::QuestNotFound(cmd.quest_id))?;

        self.members
            .find_by_id(&cmd.member_id)
            .await?
            .ok_or(QuestError::MemberNotFound(cmd.member_id))?;

        if let Some(existing) = self.member_quests.find(&cmd.member_id, &cmd.quest_id).await? {
            let replaceable = existing.is_claimed() && quest.repeatable;
            if !replaceable {
                return Err(QuestError::already_assigned(cmd.member_id, cmd.quest_id));
            }
        }

        let now = Timestamp::now();
        let member_quest = MemberQuest::assign(&quest, cmd.member_id, now);
        self.member_quests.save(&member_quest).await?;

        let event = QuestAssigned {
            event_id: EventId::new(),
            member_id: cmd.member_id,
            quest_id: cmd.quest_id,
            assigned_at: now,
        };
        if let Err(e) = self.event_publisher.publish(event.to_envelope()).await {
            warn!(
                member_id = %cmd.member_id,
                quest_id = %cmd.quest_id,
                error = %e,
                "Failed to publish quest.assigned event"
            );
        }

        Ok(member_quest)
    }
}
