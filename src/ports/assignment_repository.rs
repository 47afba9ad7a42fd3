//! Assignment repository port (write side).
//!
//! Assignment rows are derived data: they are always replaced wholesale
//! for an item, never partially updated. Implementations must make the
//! replacement atomic per item (delete-then-insert in one transaction).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ReceiptItemId};
use crate::domain::receipt::ReceiptItemAssignment;

/// Repository port for receipt item assignment rows.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// All assignment rows for one item.
    async fn find_by_item(
        &self,
        item_id: &ReceiptItemId,
    ) -> Result<Vec<ReceiptItemAssignment>, DomainError>;

    /// Replace all assignment rows for an item with the given set.
    ///
    /// Delete-then-insert semantics: prior rows for the item are removed
    /// atomically with the insert. Passing an empty vec clears the item.
    async fn replace_for_item(
        &self,
        item_id: &ReceiptItemId,
        assignments: Vec<ReceiptItemAssignment>,
    ) -> Result<(), DomainError>;

    /// Delete all assignment rows for an item.
    ///
    /// Used when an item is removed (explicit cascade).
    async fn delete_for_item(&self, item_id: &ReceiptItemId) -> Result<(), DomainError>;
}
