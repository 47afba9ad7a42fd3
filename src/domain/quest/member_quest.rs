//! MemberQuest aggregate and its status state machine.
//!
//! Lifecycle: `InProgress → Completed → Claimed`. No backward transitions
//! and nothing leaves `Claimed`. Mutators return `bool` for the expected
//! "not yet eligible" cases (claim before completion, progress after claim)
//! rather than erroring; those are frequent, not exceptional.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MemberId, QuestId, StateMachine, Timestamp};

use super::{Quest, QuestType};

/// Status of a member's quest instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    InProgress,
    Completed,
    Claimed,
}

impl StateMachine for QuestStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use QuestStatus::*;
        matches!((self, target), (InProgress, Completed) | (Completed, Claimed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use QuestStatus::*;
        match self {
            InProgress => vec![Completed],
            Completed => vec![Claimed],
            Claimed => vec![],
        }
    }
}

/// One member's progress on one quest.
///
/// # Invariants
///
/// - `progress <= quest.target` at all times
/// - `completed_at` is set exactly when status first reaches `Completed`
/// - `claimed_at` is set exactly when status reaches `Claimed`
/// - `version` increases by exactly one per persisted update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberQuest {
    pub member_id: MemberId,
    pub quest_id: QuestId,
    pub status: QuestStatus,
    pub progress: u32,
    pub assigned_at: Timestamp,
    pub start_time: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub claimed_at: Option<Timestamp>,
    /// Optimistic concurrency version, checked on update.
    pub version: u64,
}

impl MemberQuest {
    /// Creates a fresh instance for a member taking on a quest.
    ///
    /// Timed quests get a start time; daily/weekly windows are derived from
    /// `assigned_at` instead.
    pub fn assign(quest: &Quest, member_id: MemberId, now: Timestamp) -> Self {
        let start_time = match quest.quest_type {
            QuestType::Timed => Some(now),
            QuestType::Daily | QuestType::Weekly => None,
        };
        Self {
            member_id,
            quest_id: quest.id,
            status: QuestStatus::InProgress,
            progress: 0,
            assigned_at: now,
            start_time,
            completed_at: None,
            claimed_at: None,
            version: 0,
        }
    }

    /// Applies a new absolute progress value, clamped to `[0, target]`.
    ///
    /// Transitions to `Completed` (stamping `completed_at`) when the clamped
    /// value reaches the target while in progress. Returns whether any state
    /// changed; re-applying the current value, or touching a quest that is
    /// already completed or claimed, is a no-op.
    pub fn update_progress(&mut self, new_progress: u32, target: u32, now: Timestamp) -> bool {
        if self.status != QuestStatus::InProgress {
            return false;
        }
        let clamped = new_progress.min(target);
        if clamped == self.progress {
            return false;
        }
        self.progress = clamped;
        if self.progress >= target {
            self.status = QuestStatus::Completed;
            self.completed_at = Some(now);
        }
        true
    }

    /// Forces the quest to `Completed`, used when a single action fully
    /// satisfies it.
    ///
    /// Returns whether a transition happened; already-completed and claimed
    /// quests are left untouched.
    pub fn force_complete(&mut self, target: u32, now: Timestamp) -> bool {
        if self.status != QuestStatus::InProgress {
            return false;
        }
        self.progress = target;
        self.status = QuestStatus::Completed;
        self.completed_at = Some(now);
        true
    }

    /// Claims a completed quest.
    ///
    /// Only valid from `Completed`; every other state (still in progress,
    /// already claimed) is a no-op returning `false`, so reward grants keyed
    /// on this return value happen at most once.
    pub fn claim(&mut self, now: Timestamp) -> bool {
        if self.status != QuestStatus::Completed {
            return false;
        }
        self.status = QuestStatus::Claimed;
        self.claimed_at = Some(now);
        true
    }

    /// Whether the quest is still accepting progress.
    pub fn is_in_progress(&self) -> bool {
        self.status == QuestStatus::InProgress
    }

    /// Whether the quest has been claimed.
    pub fn is_claimed(&self) -> bool {
        self.status == QuestStatus::Claimed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SpendingCategory;
    use crate::domain::quest::{QuestCategory, QuestDifficulty};

    fn daily_quest(target: u32) -> Quest {
        Quest::try_new(
            QuestId::new(),
            QuestType::Daily,
            "Log expenses",
            "Log expenses today",
            30,
            target,
            QuestDifficulty::Easy,
            QuestCategory::Any,
            None,
            true,
        )
        .unwrap()
    }

    fn timed_quest() -> Quest {
        Quest::try_new(
            QuestId::new(),
            QuestType::Timed,
            "Groceries sprint",
            "Log two grocery expenses within an hour",
            50,
            2,
            QuestDifficulty::Medium,
            QuestCategory::Spending(SpendingCategory::Groceries),
            Some(3600),
            false,
        )
        .unwrap()
    }

    #[test]
    fn assign_starts_in_progress_with_zero_progress() {
        let quest = daily_quest(3);
        let member_quest = MemberQuest::assign(&quest, MemberId::new(), Timestamp::now());

        assert_eq!(member_quest.status, QuestStatus::InProgress);
        assert_eq!(member_quest.progress, 0);
        assert!(member_quest.start_time.is_none());
        assert!(member_quest.completed_at.is_none());
    }

    #[test]
    fn assign_stamps_start_time_for_timed_quests() {
        let quest = timed_quest();
        let now = Timestamp::now();
        let member_quest = MemberQuest::assign(&quest, MemberId::new(), now);

        assert_eq!(member_quest.start_time, Some(now));
    }

    #[test]
    fn update_progress_clamps_to_target_and_completes() {
        let quest = daily_quest(3);
        let mut member_quest = MemberQuest::assign(&quest, MemberId::new(), Timestamp::now());

        let changed = member_quest.update_progress(7, quest.target, Timestamp::now());

        assert!(changed);
        assert_eq!(member_quest.progress, 3);
        assert_eq!(member_quest.status, QuestStatus::Completed);
        assert!(member_quest.completed_at.is_some());
    }

    #[test]
    fn update_progress_below_target_stays_in_progress() {
        let quest = daily_quest(3);
        let mut member_quest = MemberQuest::assign(&quest, MemberId::new(), Timestamp::now());

        assert!(member_quest.update_progress(2, quest.target, Timestamp::now()));
        assert_eq!(member_quest.status, QuestStatus::InProgress);
        assert_eq!(member_quest.progress, 2);
    }

    #[test]
    fn reapplying_same_progress_is_noop() {
        let quest = daily_quest(3);
        let mut member_quest = MemberQuest::assign(&quest, MemberId::new(), Timestamp::now());

        assert!(member_quest.update_progress(2, quest.target, Timestamp::now()));
        assert!(!member_quest.update_progress(2, quest.target, Timestamp::now()));
    }

    #[test]
    fn update_progress_after_claim_is_noop() {
        let quest = daily_quest(1);
        let mut member_quest = MemberQuest::assign(&quest, MemberId::new(), Timestamp::now());

        member_quest.update_progress(1, quest.target, Timestamp::now());
        member_quest.claim(Timestamp::now());

        assert!(!member_quest.update_progress(0, quest.target, Timestamp::now()));
        assert_eq!(member_quest.progress, 1);
        assert_eq!(member_quest.status, QuestStatus::Claimed);
    }

    #[test]
    fn force_complete_transitions_from_in_progress() {
        let quest = daily_quest(5);
        let mut member_quest = MemberQuest::assign(&quest, MemberId::new(), Timestamp::now());

        assert!(member_quest.force_complete(quest.target, Timestamp::now()));
        assert_eq!(member_quest.status, QuestStatus::Completed);
        assert_eq!(member_quest.progress, 5);
    }

    #[test]
    fn force_complete_is_noop_when_already_completed_or_claimed() {
        let quest = daily_quest(1);
        let mut member_quest = MemberQuest::assign(&quest, MemberId::new(), Timestamp::now());

        assert!(member_quest.force_complete(quest.target, Timestamp::now()));
        assert!(!member_quest.force_complete(quest.target, Timestamp::now()));

        member_quest.claim(Timestamp::now());
        assert!(!member_quest.force_complete(quest.target, Timestamp::now()));
    }

    #[test]
    fn claim_only_succeeds_from_completed() {
        let quest = daily_quest(2);
        let mut member_quest = MemberQuest::assign(&quest, MemberId::new(), Timestamp::now());

        // still in progress
        assert!(!member_quest.claim(Timestamp::now()));

        member_quest.update_progress(2, quest.target, Timestamp::now());
        assert!(member_quest.claim(Timestamp::now()));
        assert!(member_quest.claimed_at.is_some());

        // second claim is rejected
        assert!(!member_quest.claim(Timestamp::now()));
    }

    #[test]
    fn status_state_machine_has_no_backward_transitions() {
        assert!(QuestStatus::InProgress.can_transition_to(&QuestStatus::Completed));
        assert!(QuestStatus::Completed.can_transition_to(&QuestStatus::Claimed));

        assert!(!QuestStatus::Completed.can_transition_to(&QuestStatus::InProgress));
        assert!(!QuestStatus::Claimed.can_transition_to(&QuestStatus::Completed));
        assert!(!QuestStatus::InProgress.can_transition_to(&QuestStatus::Claimed));
    }

    #[test]
    fn claimed_is_terminal() {
        assert!(QuestStatus::Claimed.is_terminal());
        assert!(!QuestStatus::InProgress.is_terminal());
        assert!(!QuestStatus::Completed.is_terminal());
    }
}
