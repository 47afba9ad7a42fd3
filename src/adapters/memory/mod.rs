//! In-memory storage adapters.
//!
//! Back the store ports for tests and single-process wiring. Each adapter
//! serializes its operations behind one lock, so the port contracts
//! (atomic replacement, version checks, insert-once grants) hold per call.

mod assignment_repository;
mod member_badge_repository;
mod member_quest_repository;
mod member_repository;
mod quest_catalog;
mod receipt_store;

pub use assignment_repository::InMemoryAssignmentRepository;
pub use member_badge_repository::InMemoryMemberBadgeRepository;
pub use member_quest_repository::InMemoryMemberQuestRepository;
pub use member_repository::InMemoryMemberRepository;
pub use quest_catalog::{InMemoryQuestCatalog, DEFAULT_QUESTS};
pub use receipt_store::InMemoryReceiptStore;
