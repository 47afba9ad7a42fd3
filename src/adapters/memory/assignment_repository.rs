//! In-memory assignment repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, ReceiptItemId};
use crate::domain::receipt::ReceiptItemAssignment;
use crate::ports::AssignmentRepository;

/// In-memory assignment rows, keyed by item.
///
/// `replace_for_item` swaps an item's rows under one write lock, matching
/// the atomic delete-then-insert the port requires.
pub struct InMemoryAssignmentRepository {
    assignments: RwLock<HashMap<ReceiptItemId, Vec<ReceiptItemAssignment>>>,
}

impl InMemoryAssignmentRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            assignments: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryAssignmentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryAssignmentRepository {
    async fn find_by_item(
        &self,
        item_id: &ReceiptItemId,
    ) -> Result<Vec<ReceiptItemAssignment>, DomainError> {
        let assignments = self
            .assignments
            .read()
            .expect("InMemoryAssignmentRepository: lock poisoned");
        Ok(assignments.get(item_id).cloned().unwrap_or_default())
    }

    async fn replace_for_item(
        &self,
        item_id: &ReceiptItemId,
        rows: Vec<ReceiptItemAssignment>,
    ) -> Result<(), DomainError> {
        let mut assignments = self
            .assignments
            .write()
            .expect("InMemoryAssignmentRepository: lock poisoned");
        assignments.insert(*item_id, rows);
        Ok(())
    }

    async fn delete_for_item(&self, item_id: &ReceiptItemId) -> Result<(), DomainError> {
        let mut assignments = self
            .assignments
            .write()
            .expect("InMemoryAssignmentRepository: lock poisoned");
        assignments.remove(item_id);
        Ok(())
    }
}
