//! Household domain module.
//!
//! Holds the member aggregate (spending and progression counters) and the
//! badge reference data with its milestone tables.
//!
//! # Module Structure
//!
//! - `member` - HouseholdMember aggregate and MemberRole
//! - `badge` - Badge catalog, MemberBadge grants, milestone tables

mod badge;
mod member;

pub use badge::{
    earned_badges, Badge, BadgeMilestone, MemberBadge, QUEST_COUNT_MILESTONES, STREAK_MILESTONES,
};
pub use member::{HouseholdMember, MemberRole};
