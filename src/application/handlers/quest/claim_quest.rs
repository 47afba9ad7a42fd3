//! ClaimQuestHandler - Command handler for claiming a completed quest.
//!
//! Claiming is the only path that grants rewards, and it grants them
//! exactly once: the instance's `Completed → Claimed` transition is
//! version-checked first, and XP, streak, and badges are only applied
//! after that write wins. A repeated or racing claim sees a non-Completed
//! instance and returns `Ok(false)` with no mutation.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::QuestScheduleConfig;
use crate::domain::foundation::{
    ErrorCode, EventId, MemberId, QuestId, SerializableDomainEvent, Timestamp,
};
use crate::domain::household::{earned_badges, HouseholdMember, MemberBadge};
use crate::domain::quest::{BadgeEarned, Quest, QuestClaimed, QuestError, QuestType};
use crate::ports::{
    EventPublisher, MemberBadgeRepository, MemberQuestRepository, MemberRepository, QuestCatalog,
};

const MAX_VERSION_RETRIES: usize = 5;

/// Command to claim a completed quest's reward.
#[derive(Debug, Clone)]
pub struct ClaimQuestCommand {
    pub member_id: MemberId,
    pub quest_id: QuestId,
}

/// Handler for quest claims.
pub struct ClaimQuestHandler {
    member_quests: Arc<dyn MemberQuestRepository>,
    members: Arc<dyn MemberRepository>,
    badges: Arc<dyn MemberBadgeRepository>,
    catalog: Arc<dyn QuestCatalog>,
    event_publisher: Arc<dyn EventPublisher>,
    schedule: QuestScheduleConfig,
}

impl ClaimQuestHandler {
    pub fn new(
        member_quests: Arc<dyn MemberQuestRepository>,
        members: Arc<dyn MemberRepository>,
        badges: Arc<dyn MemberBadgeRepository>,
        catalog: Arc<dyn QuestCatalog>,
        event_publisher: Arc<dyn EventPublisher>,
        schedule: QuestScheduleConfig,
    ) -> Self {
        Self {
            member_quests,
            members,
            badges,
            catalog,
            event_publisher,
            schedule,
        }
    }

    pub async fn handle(&self, cmd: ClaimQuestCommand) -> Result<bool, QuestError> {
        let Some(existing) = self.member_quests.find(&cmd.member_id, &cmd.quest_id).await?
        else {
            return Ok(false);
        };
        let quest = self
            .catalog
            .get_by_id(&existing.quest_id)
            .await?
            .ok_or(QuestError::QuestNotFound(existing.quest_id))?;
        let now = Timestamp::now();

        // The instance transition is the claim's commit point
        if !self.claim_instance(&cmd, now).await? {
            return Ok(false);
        }

        let member = self.grant_rewards(&cmd, &quest, now).await?;
        self.grant_milestone_badges(&member, now).await?;

        let event = QuestClaimed {
            event_id: EventId::new(),
            member_id: cmd.member_id,
            quest_id: cmd.quest_id,
            xp_awarded: quest.xp_reward,
            streak: member.streak,
            quests_completed: member.quests_completed,
            claimed_at: now,
        };
        if let Err(e) = self.event_publisher.publish(event.to_envelope()).await {
            warn!(
                member_id = %cmd.member_id,
                quest_id = %cmd.quest_id,
                error = %e,
                "Failed to publish quest.claimed event"
            );
        }

        debug!(
            member_id = %cmd.member_id,
            quest_id = %cmd.quest_id,
            xp = quest.xp_reward,
            "Quest claimed"
        );

        Ok(true)
    }

    /// Transitions the instance to `Claimed` under the version check.
    ///
    /// Returns `Ok(false)` when the instance is missing or not claimable;
    /// a lost race re-reads and re-evaluates, so the loser of two
    /// concurrent claims lands here and backs off.
    async fn claim_instance(
        &self,
        cmd: &ClaimQuestCommand,
        now: Timestamp,
    ) -> Result<bool, QuestError> {
        for _ in 0..MAX_VERSION_RETRIES {
            let Some(mut member_quest) =
                self.member_quests.find(&cmd.member_id, &cmd.quest_id).await?
            else {
                return Ok(false);
            };

            if !member_quest.claim(now) {
                return Ok(false);
            }

            match self.member_quests.update(&member_quest).await {
                Ok(()) => return Ok(true),
                Err(e) if e.code == ErrorCode::VersionConflict => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(QuestError::infrastructure(format!(
            "Claim for member {} kept conflicting",
            cmd.member_id
        )))
    }

    /// Grants XP, bumps the quest counter, and advances the streak for
    /// daily quests, retrying on version conflicts.
    async fn grant_rewards(
        &self,
        cmd: &ClaimQuestCommand,
        quest: &Quest,
        now: Timestamp,
    ) -> Result<HouseholdMember, QuestError> {
        for _ in 0..MAX_VERSION_RETRIES {
            let mut member = self
                .members
                .find_by_id(&cmd.member_id)
                .await?
                .ok_or(QuestError::MemberNotFound(cmd.member_id))?;

            member.record_quest_claim(quest.xp_reward, now);
            if quest.quest_type == QuestType::Daily {
                let current = self.schedule.day_bucket(&now);
                let previous = member
                    .last_streak_at
                    .map(|at| self.schedule.day_bucket(&at));
                member.advance_streak(current, previous, now);
            }

            match self.members.update(&member).await {
                Ok(()) => return Ok(member),
                Err(e) if e.code == ErrorCode::VersionConflict => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(QuestError::infrastructure(format!(
            "Reward grant for member {} kept conflicting",
            cmd.member_id
        )))
    }

    /// Grants any newly reached milestone badges, at most once each.
    async fn grant_milestone_badges(
        &self,
        member: &HouseholdMember,
        now: Timestamp,
    ) -> Result<(), QuestError> {
        for badge in earned_badges(member.streak, member.quests_completed) {
            if self.badges.exists(&member.id, &badge.id).await? {
                continue;
            }
            let grant = MemberBadge::new(member.id, badge.id.clone(), now);
            if !self.badges.insert(&grant).await? {
                // Raced with another claim; the other grant stands
                continue;
            }

            let event = BadgeEarned {
                event_id: EventId::new(),
                member_id: member.id,
                badge_id: badge.id.clone(),
                earned_at: now,
            };
            if let Err(e) = self.event_publisher.publish(event.to_envelope()).await {
                warn!(
                    member_id = %member.id,
                    badge_id = %badge.id,
                    error = %e,
                    "Failed to publish badge.earned event"
                );
            }
        }
        Ok(())
    }
}
