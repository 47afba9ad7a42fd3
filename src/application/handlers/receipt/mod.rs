//! Receipt assignment handlers.
//!
//! - `AssignItemsHandler` - split a receipt's items among members and
//!   settle expenditure counters

mod assign_items;

pub use assign_items::{
    AssignItemsHandler, AssignReceiptItemsCommand, ItemAssignmentRequest, ReceiptAssignmentView,
};
