//! UpdateProgressHandler - Command handler for recording quest progress.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::{
    ErrorCode, EventId, MemberId, QuestId, SerializableDomainEvent, Timestamp,
};
use crate::domain::quest::{QuestCompleted, QuestError, QuestProgressed, QuestStatus};
use crate::ports::{EventPublisher, MemberQuestRepository, QuestCatalog};

const MAX_VERSION_RETRIES: usize = 5;

/// Command to set a member quest's absolute progress.
#[derive(Debug, Clone)]
pub struct UpdateProgressCommand {
    pub member_id: MemberId,
    pub quest_id: QuestId,
    pub progress: u32,
}

/// Handler for quest progress updates.
///
/// Returns `Ok(false)` for the expected no-op cases: the pair has no
/// instance, the value doesn't change anything, or the instance is past
/// `InProgress`. Crossing the target transitions the quest to `Completed`.
pub struct UpdateProgressHandler {
    member_quests: Arc<dyn MemberQuestRepository>,
    catalog: Arc<dyn QuestCatalog>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl UpdateProgressHandler {
    pub fn new(
        member_quests: Arc<dyn MemberQuestRepository>,
        catalog: Arc<dyn QuestCatalog>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            member_quests,
            catalog,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: UpdateProgressCommand) -> Result<bool, QuestError> {
        let quest = self
            .catalog
            .get_by_id(&cmd.quest_id)
            .await?
            .ok_or(QuestError::QuestNotFound(cmd.quest_id))?;
        let now = Timestamp::now();

        for _ in 0..MAX_VERSION_RETRIES {
            let Some(mut member_quest) =
                self.member_quests.find(&cmd.member_id, &cmd.quest_id).await?
            else {
                return Ok(false);
            };

            if !member_quest.update_progress(cmd.progress, quest.target, now) {
                return Ok(false);
            }

            match self.member_quests.update(&member_quest).await {
                Ok(()) => {
                    self.publish_transition(&cmd, member_quest.status, member_quest.progress, quest.target, now)
                        .await;
                    return Ok(true);
                }
                Err(e) if e.code == ErrorCode::VersionConflict => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(QuestError::infrastructure(format!(
            "Progress update for member {} kept conflicting",
            cmd.member_id
        )))
    }

    async fn publish_transition(
        &self,
        cmd: &UpdateProgressCommand,
        status: QuestStatus,
        progress: u32,
        target: u32,
        now: Timestamp,
    ) {
        let result = if status == QuestStatus::Completed {
            let event = QuestCompleted {
                event_id: EventId::new(),
                member_id: cmd.member_id,
                quest_id: cmd.quest_id,
                completed_at: now,
            };
            self.event_publisher.publish(event.to_envelope()).await
        } else {
            let event = QuestProgressed {
                event_id: EventId::new(),
                member_id: cmd.member_id,
                quest_id: cmd.quest_id,
                progress,
                target,
                progressed_at: now,
            };
            self.event_publisher.publish(event.to_envelope()).await
        };
        if let Err(e) = result {
            warn!(
                member_id = %cmd.member_id,
                quest_id = %cmd.quest_id,
                error = %e,
                "Failed to publish quest progress event"
            );
        }
    }
}
