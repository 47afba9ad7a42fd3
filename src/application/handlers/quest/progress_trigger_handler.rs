//! QuestProgressTriggerHandler - Event handler advancing quests from
//! domain activity.
//!
//! Listens for `expense.logged.v1` and `receipt.scanned.v1`, resolves the
//! acting member, and advances every in-progress quest whose category
//! matches the event and whose period window is still open. One event may
//! advance several quests.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::QuestScheduleConfig;
use crate::domain::foundation::{
    DomainError, ErrorCode, EventEnvelope, EventId, HouseholdId, SerializableDomainEvent,
    SpendingCategory, Timestamp, UserId,
};
use crate::domain::quest::{
    MemberQuest, Quest, QuestCompleted, QuestProgressed, QuestStatus, QuestType,
};
use crate::domain::receipt::{ExpenseLogged, ReceiptScanned};
use crate::ports::{
    EventHandler, EventPublisher, MemberQuestRepository, MemberRepository, QuestCatalog,
};

const MAX_VERSION_RETRIES: usize = 5;

/// Fixed progress increment per matching action.
const PROGRESS_PER_ACTION: u32 = 1;

/// Handles activity events to advance quest progress.
pub struct QuestProgressTriggerHandler {
    members: Arc<dyn MemberRepository>,
    member_quests: Arc<dyn MemberQuestRepository>,
    catalog: Arc<dyn QuestCatalog>,
    event_publisher: Arc<dyn EventPublisher>,
    schedule: QuestScheduleConfig,
}

impl QuestProgressTriggerHandler {
    pub fn new(
        members: Arc<dyn MemberRepository>,
        member_quests: Arc<dyn MemberQuestRepository>,
        catalog: Arc<dyn QuestCatalog>,
        event_publisher: Arc<dyn EventPublisher>,
        schedule: QuestScheduleConfig,
    ) -> Self {
        Self {
            members,
            member_quests,
            catalog,
            event_publisher,
            schedule,
        }
    }

    /// Whether a quest's progress window is still open.
    fn window_open(&self, quest: &Quest, member_quest: &MemberQuest, now: &Timestamp) -> bool {
        match quest.quest_type {
            QuestType::Daily => self.schedule.same_day(&member_quest.assigned_at, now),
            QuestType::Weekly => self.schedule.same_week(&member_quest.assigned_at, now),
            QuestType::Timed => match (member_quest.start_time, quest.time_limit_secs) {
                (Some(start), Some(limit)) => *now <= start.plus_secs(limit),
                _ => true,
            },
        }
    }

    /// Advances one quest instance by the fixed increment, retrying on
    /// version conflicts so concurrent events are not lost.
    async fn advance(
        &self,
        member_quest: MemberQuest,
        quest: &Quest,
        now: Timestamp,
        causation_id: &str,
    ) -> Result<(), DomainError> {
        let mut current = member_quest;
        for _ in 0..MAX_VERSION_RETRIES {
            let new_progress = current.progress + PROGRESS_PER_ACTION;
            let mut updated = current.clone();
            if !updated.update_progress(new_progress, quest.target, now) {
                return Ok(());
            }

            match self.member_quests.update(&updated).await {
                Ok(()) => {
                    self.publish_transition(&updated, quest, now, causation_id).await;
                    return Ok(());
                }
                Err(e) if e.code == ErrorCode::VersionConflict => {
                    match self
                        .member_quests
                        .find(&updated.member_id, &updated.quest_id)
                        .await?
                    {
                        Some(fresh) => current = fresh,
                        None => return Ok(()),
                    }
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            member_id = %current.member_id,
            quest_id = %current.quest_id,
            "Quest progress advance kept conflicting; dropping increment"
        );
        Ok(())
    }

    async fn publish_transition(
        &self,
        member_quest: &MemberQuest,
        quest: &Quest,
        now: Timestamp,
        causation_id: &str,
    ) {
        let envelope = if member_quest.status == QuestStatus::Completed {
            QuestCompleted {
                event_id: EventId::new(),
                member_id: member_quest.member_id,
                quest_id: member_quest.quest_id,
                completed_at: now,
            }
            .to_envelope()
        } else {
            QuestProgressed {
                event_id: EventId::new(),
                member_id: member_quest.member_id,
                quest_id: member_quest.quest_id,
                progress: member_quest.progress,
                target: quest.target,
                progressed_at: now,
            }
            .to_envelope()
        };
        let envelope = envelope.with_causation_id(causation_id);
        if let Err(e) = self.event_publisher.publish(envelope).await {
            warn!(
                member_id = %member_quest.member_id,
                quest_id = %member_quest.quest_id,
                error = %e,
                "Failed to publish quest progress event"
            );
        }
    }

    async fn advance_matching_quests(
        &self,
        user_id: &UserId,
        household_id: &HouseholdId,
        category: Option<SpendingCategory>,
        causation_id: &str,
    ) -> Result<(), DomainError> {
        let Some(member) = self
            .members
            .find_by_user_and_household(user_id, household_id)
            .await?
        else {
            debug!(
                user_id = %user_id,
                household_id = %household_id,
                "No member for event; nothing to advance"
            );
            return Ok(());
        };

        let now = Timestamp::now();
        for member_quest in self.member_quests.list_in_progress(&member.id).await? {
            let Some(quest) = self.catalog.get_by_id(&member_quest.quest_id).await? else {
                warn!(
                    quest_id = %member_quest.quest_id,
                    "Quest instance references unknown catalog entry; skipping"
                );
                continue;
            };
            if !quest.category.matches(category) {
                continue;
            }
            if !self.window_open(&quest, &member_quest, &now) {
                continue;
            }
            self.advance(member_quest, &quest, now, causation_id).await?;
        }

        Ok(())
    }
}

#[async_trait]
impl EventHandler for QuestProgressTriggerHandler {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let causation_id = event.event_id.as_str();
        match event.event_type.as_str() {
            "expense.logged.v1" => {
                let payload: ExpenseLogged = event
                    .payload_as()
                    .map_err(|e| DomainError::new(ErrorCode::ValidationFailed, e.to_string()))?;
                self.advance_matching_quests(
                    &payload.user_id,
                    &payload.household_id,
                    Some(payload.category),
                    causation_id,
                )
                .await
            }
            "receipt.scanned.v1" => {
                let payload: ReceiptScanned = event
                    .payload_as()
                    .map_err(|e| DomainError::new(ErrorCode::ValidationFailed, e.to_string()))?;
                self.advance_matching_quests(
                    &payload.user_id,
                    &payload.household_id,
                    None,
                    causation_id,
                )
                .await
            }
            other => {
                debug!(event_type = other, "Event does not drive quest progress");
                Ok(())
            }
        }
    }

    fn name(&self) -> &'static str {
        "QuestProgressTriggerHandler"
    }
}
