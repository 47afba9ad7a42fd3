//! ReceiptReader port (read side).
//!
//! The receipt aggregate (upload, OCR parsing, confirmation) is managed
//! outside this core; assignment only needs to read a receipt with its
//! items.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ReceiptId};
use crate::domain::receipt::Receipt;

/// Read port for receipts and their line items.
#[async_trait]
pub trait ReceiptReader: Send + Sync {
    /// Load a receipt with all of its items.
    ///
    /// Returns `None` if the receipt does not exist.
    async fn get_by_id(&self, id: &ReceiptId) -> Result<Option<Receipt>, DomainError>;
}
