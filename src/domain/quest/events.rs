//! Quest lifecycle domain events.
//!
//! One event per transition (assigned, progressed, completed, claimed) plus
//! badge grants. Aggregate id is the owning member so a member's whole
//! progression history groups together.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, BadgeId, EventId, MemberId, QuestId, Timestamp};

/// Published when a quest is assigned to a member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestAssigned {
    /// Unique event identifier for deduplication.
    pub event_id: EventId,
    /// Member taking on the quest.
    pub member_id: MemberId,
    /// The assigned quest.
    pub quest_id: QuestId,
    /// When the quest was assigned.
    pub assigned_at: Timestamp,
}

domain_event!(
    QuestAssigned,
    event_type = "quest.assigned.v1",
    schema_version = 1,
    aggregate_id = member_id,
    aggregate_type = "MemberQuest",
    occurred_at = assigned_at,
    event_id = event_id
);

/// Published when quest progress advances without completing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestProgressed {
    /// Unique event identifier for deduplication.
    pub event_id: EventId,
    /// Member whose progress advanced.
    pub member_id: MemberId,
    /// The quest that progressed.
    pub quest_id: QuestId,
    /// Progress after the advance.
    pub progress: u32,
    /// The quest's progress goal.
    pub target: u32,
    /// When the progress was recorded.
    pub progressed_at: Timestamp,
}

domain_event!(
    QuestProgressed,
    event_type = "quest.progressed.v1",
    schema_version = 1,
    aggregate_id = member_id,
    aggregate_type = "MemberQuest",
    occurred_at = progressed_at,
    event_id = event_id
);

/// Published when a quest reaches its target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestCompleted {
    /// Unique event identifier for deduplication.
    pub event_id: EventId,
    /// Member who completed the quest.
    pub member_id: MemberId,
    /// The completed quest.
    pub quest_id: QuestId,
    /// When the quest completed.
    pub completed_at: Timestamp,
}

domain_event!(
    QuestCompleted,
    event_type = "quest.completed.v1",
    schema_version = 1,
    aggregate_id = member_id,
    aggregate_type = "MemberQuest",
    occurred_at = completed_at,
    event_id = event_id
);

/// Published when a member claims a completed quest's reward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestClaimed {
    /// Unique event identifier for deduplication.
    pub event_id: EventId,
    /// Member who claimed the reward.
    pub member_id: MemberId,
    /// The claimed quest.
    pub quest_id: QuestId,
    /// XP granted by this claim.
    pub xp_awarded: u64,
    /// Member's streak after the claim.
    pub streak: u32,
    /// Member's completed-quest count after the claim.
    pub quests_completed: u32,
    /// When the claim happened.
    pub claimed_at: Timestamp,
}

domain_event!(
    QuestClaimed,
    event_type = "quest.claimed.v1",
    schema_version = 1,
    aggregate_id = member_id,
    aggregate_type = "MemberQuest",
    occurred_at = claimed_at,
    event_id = event_id
);

/// Published when a milestone badge is granted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeEarned {
    /// Unique event identifier for deduplication.
    pub event_id: EventId,
    /// Member who earned the badge.
    pub member_id: MemberId,
    /// The earned badge.
    pub badge_id: BadgeId,
    /// When the badge was earned.
    pub earned_at: Timestamp,
}

domain_event!(
    BadgeEarned,
    event_type = "badge.earned.v1",
    schema_version = 1,
    aggregate_id = member_id,
    aggregate_type = "HouseholdMember",
    occurred_at = earned_at,
    event_id = event_id
);
