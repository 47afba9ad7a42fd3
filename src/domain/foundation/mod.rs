//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, error types, and event infrastructure
//! that form the vocabulary of the Hearth Ledger domain.

mod category;
mod errors;
mod events;
mod ids;
mod money;
mod quantity;
mod rate;
mod state_machine;
mod timestamp;

pub use category::SpendingCategory;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{
    AssignmentId, BadgeId, HouseholdId, MemberId, QuestId, ReceiptId, ReceiptItemId, UserId,
};
pub use money::Money;
pub use quantity::Quantity;
pub use rate::Rate;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
