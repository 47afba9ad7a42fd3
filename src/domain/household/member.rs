//! HouseholdMember aggregate entity.
//!
//! Carries the shared mutable counters of the progression and spending
//! systems: expenditure totals, XP, streak, and the completed-quest count.
//!
//! # Design Decisions
//!
//! - **Single write path**: expenditure moves only through the assignment
//!   orchestrator and direct expense creation; XP and counters only through
//!   quest claim. No other code may touch these fields.
//! - **Optimistic concurrency**: `version` is checked by the repository on
//!   update; concurrent writers retry with a fresh read.
//! - **Money at cent precision**: expenditure uses the `Money` value object.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{HouseholdId, MemberId, Money, Timestamp, UserId};

/// Role of a member within a household.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    /// Household administrator.
    Parent,
    /// Regular member.
    Member,
}

/// A user's membership in a household, with spending and progression state.
///
/// # Invariants
///
/// - `version` increases by exactly one per persisted update
/// - XP and `quests_completed` only ever increase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdMember {
    /// Unique identifier for this member.
    pub id: MemberId,

    /// Household this member belongs to.
    pub household_id: HouseholdId,

    /// The backing user account.
    pub user_id: UserId,

    /// Role within the household.
    pub role: MemberRole,

    /// Spending attributed this month.
    pub monthly_expenditure: Money,

    /// Spending attributed over the member's lifetime.
    pub lifetime_expenditure: Money,

    /// When expenditure was last changed.
    pub last_expenditure_update: Option<Timestamp>,

    /// Experience points earned from claimed quests.
    pub xp: u64,

    /// Consecutive-day claim streak.
    pub streak: u32,

    /// When the streak was last advanced.
    pub last_streak_at: Option<Timestamp>,

    /// Number of quests claimed.
    pub quests_completed: u32,

    /// Optimistic concurrency version, checked on update.
    pub version: u64,

    /// When the member joined the household.
    pub created_at: Timestamp,

    /// When the member was last updated.
    pub updated_at: Timestamp,
}

impl HouseholdMember {
    /// Creates a new member with zeroed counters.
    pub fn new(id: MemberId, household_id: HouseholdId, user_id: UserId, role: MemberRole) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            household_id,
            user_id,
            role,
            monthly_expenditure: Money::ZERO,
            lifetime_expenditure: Money::ZERO,
            last_expenditure_update: None,
            xp: 0,
            streak: 0,
            last_streak_at: None,
            quests_completed: 0,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies an expenditure delta to both counters.
    ///
    /// The delta may be negative: re-assigning a receipt to a cheaper split
    /// reduces the counters by the difference.
    pub fn add_expenditure(&mut self, delta: Money, now: Timestamp) {
        self.monthly_expenditure += delta;
        self.lifetime_expenditure += delta;
        self.last_expenditure_update = Some(now);
        self.updated_at = now;
    }

    /// Records a successful quest claim: grants XP and bumps the counter.
    pub fn record_quest_claim(&mut self, xp_reward: u64, now: Timestamp) {
        self.xp += xp_reward;
        self.quests_completed += 1;
        self.updated_at = now;
    }

    /// Advances the daily-claim streak given day buckets from the schedule.
    ///
    /// - same bucket as the last advance: no change (one claim per day counts)
    /// - bucket immediately after the last: streak + 1
    /// - anything else (gap, or first ever claim): streak resets to 1
    pub fn advance_streak(
        &mut self,
        current_bucket: i64,
        previous_bucket: Option<i64>,
        now: Timestamp,
    ) {
        match previous_bucket {
            Some(previous) if previous == current_bucket => return,
            Some(previous) if current_bucket == previous + 1 => self.streak += 1,
            _ => self.streak = 1,
        }
        self.last_streak_at = Some(now);
        self.updated_at = now;
    }
}
