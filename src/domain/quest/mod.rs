//! Quest domain module.
//!
//! Quest catalog reference data and the per-member progression state
//! machine.
//!
//! # Module Structure
//!
//! - `quest` - Quest catalog entry and its enums
//! - `member_quest` - MemberQuest aggregate and QuestStatus state machine
//! - `events` - quest lifecycle and badge events
//! - `errors` - QuestError taxonomy

mod errors;
mod events;
mod member_quest;
mod quest;

pub use errors::QuestError;
pub use events::{BadgeEarned, QuestAssigned, QuestClaimed, QuestCompleted, QuestProgressed};
pub use member_quest::{MemberQuest, QuestStatus};
pub use quest::{Quest, QuestCategory, QuestDifficulty, QuestType};
