//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to the outside world:
//! - `events` - In-process event dispatch
//! - `memory` - In-memory stores and the seeded quest catalog

pub mod events;
pub mod memory;

pub use events::InMemoryEventBus;
pub use memory::{
    InMemoryAssignmentRepository, InMemoryMemberBadgeRepository, InMemoryMemberQuestRepository,
    InMemoryMemberRepository, InMemoryQuestCatalog, InMemoryReceiptStore, DEFAULT_QUESTS,
};
