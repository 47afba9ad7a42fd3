//! Quest-specific error types.
//!
//! Only genuinely unexpected conditions surface as errors here. Expected
//! "not yet eligible" outcomes (claim before completion, progress on a
//! missing instance) are reported as `Ok(false)` by the handlers instead.

use crate::domain::foundation::{DomainError, ErrorCode, MemberId, QuestId};

/// Quest progression errors.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestError {
    /// The member already holds this quest and it cannot be re-assigned.
    AlreadyAssigned { member_id: MemberId, quest_id: QuestId },

    /// Quest was not found in the catalog.
    QuestNotFound(QuestId),

    /// Member was not found.
    MemberNotFound(MemberId),

    /// Infrastructure error.
    Infrastructure(String),
}

impl QuestError {
    pub fn already_assigned(member_id: MemberId, quest_id: QuestId) -> Self {
        QuestError::AlreadyAssigned {
            member_id,
            quest_id,
        }
    }

    pub fn quest_not_found(id: QuestId) -> Self {
        QuestError::QuestNotFound(id)
    }

    pub fn member_not_found(id: MemberId) -> Self {
        QuestError::MemberNotFound(id)
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        QuestError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            QuestError::AlreadyAssigned { .. } => ErrorCode::QuestAlreadyAssigned,
            QuestError::QuestNotFound(_) => ErrorCode::QuestNotFound,
            QuestError::MemberNotFound(_) => ErrorCode::MemberNotFound,
            QuestError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            QuestError::AlreadyAssigned {
                member_id,
                quest_id,
            } => format!("Member {} already has quest {}", member_id, quest_id),
            QuestError::QuestNotFound(id) => format!("Quest not found: {}", id),
            QuestError::MemberNotFound(id) => format!("Household member not found: {}", id),
            QuestError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for QuestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for QuestError {}

impl From<DomainError> for QuestError {
    fn from(err: DomainError) -> Self {
        QuestError::Infrastructure(err.to_string())
    }
}

impl From<QuestError> for DomainError {
    fn from(err: QuestError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
