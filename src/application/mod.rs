//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::quest::{
    AssignQuestCommand, AssignQuestHandler, ClaimQuestCommand, ClaimQuestHandler,
    CompleteQuestCommand, CompleteQuestHandler, QuestProgressTriggerHandler,
    UpdateProgressCommand, UpdateProgressHandler,
};
pub use handlers::receipt::{
    AssignItemsHandler, AssignReceiptItemsCommand, ItemAssignmentRequest, ReceiptAssignmentView,
};
