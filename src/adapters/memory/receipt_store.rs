//! In-memory receipt store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, ReceiptId};
use crate::domain::receipt::Receipt;
use crate::ports::ReceiptReader;

/// In-memory store of receipts and their items.
///
/// Receipts enter through `insert` (standing in for the out-of-scope
/// upload/OCR path) and are read through the `ReceiptReader` port.
pub struct InMemoryReceiptStore {
    receipts: RwLock<HashMap<ReceiptId, Receipt>>,
}

impl InMemoryReceiptStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            receipts: RwLock::new(HashMap::new()),
        }
    }

    /// Adds or replaces a receipt.
    pub fn insert(&self, receipt: Receipt) {
        self.receipts
            .write()
            .expect("InMemoryReceiptStore: lock poisoned")
            .insert(receipt.id, receipt);
    }
}

impl Default for InMemoryReceiptStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReceiptReader for InMemoryReceiptStore {
    async fn get_by_id(&self, id: &ReceiptId) -> Result<Option<Receipt>, DomainError> {
        let receipts = self
            .receipts
            .read()
            .expect("InMemoryReceiptStore: lock poisoned");
        Ok(receipts.get(id).cloned())
    }
}
