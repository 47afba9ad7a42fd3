//! Member repository port (write side).
//!
//! `HouseholdMember` carries the shared counters (expenditure, XP, streak,
//! quest count) that must never be double-applied. The `update` contract
//! therefore enforces optimistic concurrency: the stored row's version must
//! match the version the caller read, and the write bumps it by one.
//! Callers run a read-mutate-update retry loop on `VersionConflict`.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, HouseholdId, MemberId, UserId};
use crate::domain::household::HouseholdMember;

/// Repository port for HouseholdMember aggregates.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Save a new member.
    async fn save(&self, member: &HouseholdMember) -> Result<(), DomainError>;

    /// Update an existing member with a version check.
    ///
    /// # Errors
    ///
    /// - `MemberNotFound` if the member doesn't exist
    /// - `VersionConflict` if the stored version differs from
    ///   `member.version` (another writer got there first; re-read and retry)
    async fn update(&self, member: &HouseholdMember) -> Result<(), DomainError>;

    /// Find a member by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &MemberId) -> Result<Option<HouseholdMember>, DomainError>;

    /// Find the member backing a user within a household.
    ///
    /// Returns `None` if the user is not a member of the household. This is
    /// the lookup used when resolving event payloads to members.
    async fn find_by_user_and_household(
        &self,
        user_id: &UserId,
        household_id: &HouseholdId,
    ) -> Result<Option<HouseholdMember>, DomainError>;
}
