//! In-memory member repository with optimistic concurrency.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, HouseholdId, MemberId, UserId};
use crate::domain::household::HouseholdMember;
use crate::ports::MemberRepository;

/// In-memory HouseholdMember store.
///
/// `update` enforces the port's version check: the stored row's version
/// must equal the caller's, and the write stores version + 1. Each call
/// holds the write lock for its whole duration, so checks and writes are
/// atomic per call.
pub struct InMemoryMemberRepository {
    members: RwLock<HashMap<MemberId, HouseholdMember>>,
}

impl InMemoryMemberRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            members: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryMemberRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn save(&self, member: &HouseholdMember) -> Result<(), DomainError> {
        let mut members = self
            .members
            .write()
            .expect("InMemoryMemberRepository: lock poisoned");
        members.insert(member.id, member.clone());
        Ok(())
    }

    async fn update(&self, member: &HouseholdMember) -> Result<(), DomainError> {
        let mut members = self
            .members
            .write()
            .expect("InMemoryMemberRepository: lock poisoned");
        match members.get(&member.id) {
            None => Err(DomainError::new(
                ErrorCode::MemberNotFound,
                format!("Household member not found: {}", member.id),
            )),
            Some(stored) if stored.version != member.version => {
                Err(DomainError::version_conflict(format!(
                    "Member {} was updated concurrently (expected version {}, found {})",
                    member.id, member.version, stored.version
                )))
            }
            Some(_) => {
                let mut updated = member.clone();
                updated.version += 1;
                members.insert(updated.id, updated);
                Ok(())
            }
        }
    }

    async fn find_by_id(&self, id: &MemberId) -> Result<Option<HouseholdMember>, DomainError> {
        let members = self
            .members
            .read()
            .expect("InMemoryMemberRepository: lock poisoned");
        Ok(members.get(id).cloned())
    }

    async fn find_by_user_and_household(
        &self,
        user_id: &UserId,
        household_id: &HouseholdId,
    ) -> Result<Option<HouseholdMember>, DomainError> {
        let members = self
            .members
            .read()
            .expect("InMemoryMemberRepository: lock poisoned");
        Ok(members
            .values()
            .find(|m| m.user_id == *user_id && m.household_id == *household_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Money, Timestamp};
    use crate::domain::household::MemberRole;

    fn test_member() -> HouseholdMember {
        HouseholdMember::new(
            MemberId::new(),
            HouseholdId::new(),
            UserId::new("user-1").unwrap(),
            MemberRole::Member,
        )
    }

    #[tokio::test]
    async fn save_and_find_round_trips() {
        let repo = InMemoryMemberRepository::new();
        let member = test_member();

        repo.save(&member).await.unwrap();

        let loaded = repo.find_by_id(&member.id).await.unwrap().unwrap();
        assert_eq!(loaded, member);
    }

    #[tokio::test]
    async fn update_bumps_version() {
        let repo = InMemoryMemberRepository::new();
        let mut member = test_member();
        repo.save(&member).await.unwrap();

        member.add_expenditure(Money::from_cents(100), Timestamp::now());
        repo.update(&member).await.unwrap();

        let loaded = repo.find_by_id(&member.id).await.unwrap().unwrap();
        assert_eq!(loaded.version, member.version + 1);
        assert_eq!(loaded.monthly_expenditure.as_cents(), 100);
    }

    #[tokio::test]
    async fn update_with_stale_version_conflicts() {
        let repo = InMemoryMemberRepository::new();
        let member = test_member();
        repo.save(&member).await.unwrap();

        // First writer wins
        let mut first = repo.find_by_id(&member.id).await.unwrap().unwrap();
        first.add_expenditure(Money::from_cents(100), Timestamp::now());
        repo.update(&first).await.unwrap();

        // Second writer read the same version and must conflict
        let mut second = member.clone();
        second.add_expenditure(Money::from_cents(200), Timestamp::now());
        let err = repo.update(&second).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::VersionConflict);
    }

    #[tokio::test]
    async fn update_unknown_member_is_not_found() {
        let repo = InMemoryMemberRepository::new();
        let err = repo.update(&test_member()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::MemberNotFound);
    }

    #[tokio::test]
    async fn find_by_user_and_household_matches_both_keys() {
        let repo = InMemoryMemberRepository::new();
        let member = test_member();
        repo.save(&member).await.unwrap();

        let found = repo
            .find_by_user_and_household(&member.user_id, &member.household_id)
            .await
            .unwrap();
        assert!(found.is_some());

        let other_household = repo
            .find_by_user_and_household(&member.user_id, &HouseholdId::new())
            .await
            .unwrap();
        assert!(other_household.is_none());
    }
}
