//! MemberBadge repository port (write side).
//!
//! Badge grants are insert-once: the `(member, badge)` pair is unique and
//! a duplicate insert is a no-op, not an error. This keeps grants
//! idempotent even when two claims race past the existence check.

use async_trait::async_trait;

use crate::domain::foundation::{BadgeId, DomainError, MemberId};
use crate::domain::household::MemberBadge;

/// Repository port for badge grants.
#[async_trait]
pub trait MemberBadgeRepository: Send + Sync {
    /// Whether the member already holds the badge.
    async fn exists(&self, member_id: &MemberId, badge_id: &BadgeId)
        -> Result<bool, DomainError>;

    /// Insert a grant if the pair does not exist yet.
    ///
    /// Returns `true` if the row was inserted, `false` if the member
    /// already held the badge (no change).
    async fn insert(&self, badge: &MemberBadge) -> Result<bool, DomainError>;

    /// All badges held by a member.
    async fn list_for_member(&self, member_id: &MemberId)
        -> Result<Vec<MemberBadge>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_badge_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn MemberBadgeRepository) {}
    }
}
