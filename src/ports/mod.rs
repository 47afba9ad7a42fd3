//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Store Ports
//!
//! - `ReceiptReader` - Read receipts with their items
//! - `AssignmentRepository` - Replace/read assignment rows per item
//! - `MemberRepository` - HouseholdMember persistence with version checks
//! - `MemberQuestRepository` - MemberQuest persistence with version checks
//! - `MemberBadgeRepository` - Insert-once badge grants
//! - `QuestCatalog` - Read-only quest reference data
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing domain events
//! - `EventSubscriber` - Port for subscribing to domain events
//! - `EventHandler` - Handler that processes incoming events

mod assignment_repository;
mod event_publisher;
mod event_subscriber;
mod member_badge_repository;
mod member_quest_repository;
mod member_repository;
mod quest_catalog;
mod receipt_reader;

pub use assignment_repository::AssignmentRepository;
pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use member_badge_repository::MemberBadgeRepository;
pub use member_quest_repository::MemberQuestRepository;
pub use member_repository::MemberRepository;
pub use quest_catalog::QuestCatalog;
pub use receipt_reader::ReceiptReader;
