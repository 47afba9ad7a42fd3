//! CompleteQuestHandler - Command handler for forcing a quest to completed.
//!
//! Used when a single action fully satisfies a quest, bypassing
//! incremental progress.

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::{
    ErrorCode, EventId, MemberId, QuestId, SerializableDomainEvent, Timestamp,
};
use crate::domain::quest::{QuestCompleted, QuestError};
use crate::ports::{EventPublisher, MemberQuestRepository, QuestCatalog};

const MAX_VERSION_RETRIES: usize = 5;

/// Command to force-complete a member's quest.
#[derive(Debug, Clone)]
pub struct CompleteQuestCommand {
    pub member_id: MemberId,
    pub quest_id: QuestId,
}

/// Handler for forced quest completion.
///
/// Returns `Ok(false)` when the pair has no instance or the instance is
/// already completed or claimed.
pub struct CompleteQuestHandler {
    member_quests: Arc<dyn MemberQuestRepository>,
    catalog: Arc<dyn QuestCatalog>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CompleteQuestHandler {
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

    pub async fn handle(&self, cmd: CompleteQuestCommand) -> Result<bool, QuestError> {
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

            if !member_quest.force_complete(quest.target, now) {
                return Ok(false);
            }

            match self.member_quests.update(&member_quest).await {
                Ok(()) => {
                    let event = QuestCompleted {
                        event_id: EventId::new(),
                        member_id: cmd.member_id,
                        quest_id: cmd.quest_id,
                        completed_at: now,
                    };
                    if let Err(e) = self.event_publisher.publish(event.to_envelope()).await {
                        warn!(
                            member_id = %cmd.member_id,
                            quest_id = %cmd.quest_id,
                            error = %e,
                            "Failed to publish quest.completed event"
                        );
                    }
                    return Ok(true);
                }
                Err(e) if e.code == ErrorCode::VersionConflict => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(QuestError::infrastructure(format!(
            "Completion for member {} kept conflicting",
            cmd.member_id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{
        InMemoryEventBus, InMemoryMemberQuestRepository, InMemoryQuestCatalog,
    };
    use crate::domain::quest::{
        MemberQuest, Quest, QuestCategory, QuestDifficulty, QuestStatus, QuestType,
    };

    fn quest() -> Quest {
        Quest::try_new(
            QuestId::new(),
            QuestType::Weekly,
            "Set a grocery budget",
            "Set a grocery budget for this week",
            40,
            1,
            QuestDifficulty::Easy,
            QuestCategory::Any,
            None,
            false,
        )
        .unwrap()
    }

    struct Fixture {
        member_quests: Arc<InMemoryMemberQuestRepository>,
        bus: Arc<InMemoryEventBus>,
        handler: CompleteQuestHandler,
    }

    fn fixture(quests: Vec<Quest>) -> Fixture {
        let member_quests = Arc::new(InMemoryMemberQuestRepository::new());
        let catalog = Arc::new(InMemoryQuestCatalog::with_quests(quests));
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = CompleteQuestHandler::new(member_quests.clone(), catalog, bus.clone());
        Fixture {
            member_quests,
            bus,
            handler,
        }
    }

    #[tokio::test]
    async fn completes_an_in_progress_quest() {
        let quest = quest();
        let quest_id = quest.id;
        let member_id = MemberId::new();
        let fixture = fixture(vec![quest.clone()]);
        fixture
            .member_quests
            .save(&MemberQuest::assign(&quest, member_id, Timestamp::now()))
            .await
            .unwrap();

        let completed = fixture
            .handler
            .handle(CompleteQuestCommand {
                member_id,
                quest_id,
            })
            .await
            .unwrap();

        assert!(completed);
        let stored = fixture
            .member_quests
            .find(&member_id, &quest_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, QuestStatus::Completed);
        assert_eq!(stored.progress, quest.target);
        assert!(fixture.bus.has_event("quest.completed.v1"));
    }

    #[tokio::test]
    async fn missing_instance_is_a_noop() {
        let quest = quest();
        let quest_id = quest.id;
        let fixture = fixture(vec![quest]);

        let completed = fixture
            .handler
            .handle(CompleteQuestCommand {
                member_id: MemberId::new(),
                quest_id,
            })
            .await
            .unwrap();

        assert!(!completed);
    }

    #[tokio::test]
    async fn claimed_instance_is_a_noop() {
        let quest = quest();
        let quest_id = quest.id;
        let member_id = MemberId::new();
        let fixture = fixture(vec![quest.clone()]);

        let mut instance = MemberQuest::assign(&quest, member_id, Timestamp::now());
        instance.force_complete(quest.target, Timestamp::now());
        instance.claim(Timestamp::now());
        fixture.member_quests.save(&instance).await.unwrap();

        let completed = fixture
            .handler
            .handle(CompleteQuestCommand {
                member_id,
                quest_id,
            })
            .await
            .unwrap();

        assert!(!completed);
        assert_eq!(fixture.bus.event_count(), 0);
    }
}
