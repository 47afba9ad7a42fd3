//! Badges and the milestone tables that grant them.
//!
//! Badge definitions are reference data, seeded once. Grants happen as a
//! side effect of quest claims and are idempotent: a `(member, badge)` pair
//! exists at most once.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BadgeId, MemberId, Timestamp};

/// A badge definition from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub id: BadgeId,
    pub name: String,
    pub description: String,
}

impl Badge {
    fn new(slug: &str, name: &str, description: &str) -> Self {
        Self {
            id: BadgeId::new(slug),
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// A badge earned by a member. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberBadge {
    pub member_id: MemberId,
    pub badge_id: BadgeId,
    pub earned_at: Timestamp,
}

impl MemberBadge {
    /// Records that a member earned a badge now.
    pub fn new(member_id: MemberId, badge_id: BadgeId, earned_at: Timestamp) -> Self {
        Self {
            member_id,
            badge_id,
            earned_at,
        }
    }
}

/// A counter threshold that awards a badge when reached.
#[derive(Debug, Clone)]
pub struct BadgeMilestone {
    pub threshold: u32,
    pub badge: Badge,
}

/// Streak milestones, in ascending threshold order.
pub static STREAK_MILESTONES: Lazy<Vec<BadgeMilestone>> = Lazy::new(|| {
    vec![
        BadgeMilestone {
            threshold: 3,
            badge: Badge::new("streak-3", "Warming Up", "Claimed daily quests 3 days in a row"),
        },
        BadgeMilestone {
            threshold: 7,
            badge: Badge::new("streak-7", "One Full Week", "Claimed daily quests 7 days in a row"),
        },
        BadgeMilestone {
            threshold: 30,
            badge: Badge::new("streak-30", "Habit Formed", "Claimed daily quests 30 days in a row"),
        },
    ]
});

/// Completed-quest milestones, in ascending threshold order.
pub static QUEST_COUNT_MILESTONES: Lazy<Vec<BadgeMilestone>> = Lazy::new(|| {
    vec![
        BadgeMilestone {
            threshold: 1,
            badge: Badge::new("first-quest", "First Steps", "Claimed a first quest"),
        },
        BadgeMilestone {
            threshold: 10,
            badge: Badge::new("quest-10", "Quest Regular", "Claimed 10 quests"),
        },
        BadgeMilestone {
            threshold: 50,
            badge: Badge::new("quest-50", "Quest Veteran", "Claimed 50 quests"),
        },
    ]
});

/// Returns every badge whose milestone the given counters have reached.
///
/// Callers must still check existing grants before inserting; this only
/// evaluates thresholds.
pub fn earned_badges(streak: u32, quests_completed: u32) -> Vec<&'static Badge> {
    STREAK_MILESTONES
        .iter()
        .filter(|m| streak >= m.threshold)
        .map(|m| &m.badge)
        .chain(
            QUEST_COUNT_MILESTONES
                .iter()
                .filter(|m| quests_completed >= m.threshold)
                .map(|m| &m.badge),
        )
        .collect()
}
