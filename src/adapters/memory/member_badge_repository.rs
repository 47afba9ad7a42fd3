//! In-memory badge grant repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::{BadgeId, DomainError, MemberId};
use crate::domain::household::MemberBadge;
use crate::ports::MemberBadgeRepository;

/// In-memory badge grants, keyed by `(member, badge)`.
///
/// Insert is a single check-and-insert under the write lock, so a grant
/// can never be recorded twice even when claims race.
pub struct InMemoryMemberBadgeRepository {
    badges: RwLock<HashMap<(MemberId, BadgeId), MemberBadge>>,
}

impl InMemoryMemberBadgeRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            badges: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryMemberBadgeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemberBadgeRepository for InMemoryMemberBadgeRepository {
    async fn exists(
        &self,
        member_id: &MemberId,
        badge_id: &BadgeId,
    ) -> Result<bool, DomainError> {
        let badges = self
            .badges
            .read()
            .expect("InMemoryMemberBadgeRepository: lock poisoned");
        Ok(badges.contains_key(&(*member_id, badge_id.clone())))
    }

    async fn insert(&self, badge: &MemberBadge) -> Result<bool, DomainError> {
        let mut badges = self
            .badges
            .write()
            .expect("InMemoryMemberBadgeRepository: lock poisoned");
        let key = (badge.member_id, badge.badge_id.clone());
        if badges.contains_key(&key) {
            return Ok(false);
        }
        badges.insert(key, badge.clone());
        Ok(true)
    }

    async fn list_for_member(
        &self,
        member_id: &MemberId,
    ) -> Result<Vec<MemberBadge>, DomainError> {
        let badges = self
            .badges
            .read()
            .expect("InMemoryMemberBadgeRepository: lock poisoned");
        Ok(badges
            .values()
            .filter(|b| b.member_id == *member_id)
            .cloned()
            .collect())
    }
}
