//! Receipt line items and the receipt read view.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    HouseholdId, Money, ReceiptId, ReceiptItemId, ValidationError,
};

/// How a receipt item entered the system.
///
/// OCR-parsed items carry the parser's confidence; manually entered
/// items do not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ItemProvenance {
    Ocr { confidence: Option<f32> },
    Manual,
}

/// A single line item on a receipt.
///
/// # Invariants
///
/// - `quantity >= 1`
/// - `total_price >= 0`
/// - `unit_price × quantity ≈ total_price` is NOT enforced; OCR output
///   is noisy and the total is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    /// Unique identifier for this line item.
    pub id: ReceiptItemId,

    /// Receipt this item belongs to.
    pub receipt_id: ReceiptId,

    /// Item name as parsed or entered.
    pub name: String,

    /// Number of units on this line.
    pub quantity: u32,

    /// Price per unit, when known.
    pub unit_price: Option<Money>,

    /// Total price for the line (authoritative).
    pub total_price: Money,

    /// Position of the line on the receipt.
    pub line_number: u32,

    /// Whether the item came from OCR or manual entry.
    pub provenance: ItemProvenance,
}

impl ReceiptItem {
    /// Creates a receipt item, validating quantity and price invariants.
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        id: ReceiptItemId,
        receipt_id: ReceiptId,
        name: impl Into<String>,
        quantity: u32,
        unit_price: Option<Money>,
        total_price: Money,
        line_number: u32,
        provenance: ItemProvenance,
    ) -> Result<Self, ValidationError> {
        if quantity == 0 {
            return Err(ValidationError::out_of_range(
                "quantity",
                1,
                i64::from(u32::MAX),
                0,
            ));
        }
        if total_price.is_negative() {
            return Err(ValidationError::negative("total_price", total_price));
        }
        Ok(Self {
            id,
            receipt_id,
            name: name.into(),
            quantity,
            unit_price,
            total_price,
            line_number,
            provenance,
        })
    }
}

/// Read view of a receipt and its items, consumed from the receipt store.
///
/// The receipt aggregate itself (upload, OCR, confirmation) lives outside
/// this core; assignment only needs the item list and the owning household
/// for membership checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: ReceiptId,
    pub household_id: HouseholdId,
    pub items: Vec<ReceiptItem>,
}

impl Receipt {
    /// Finds an item on this receipt by id.
    pub fn find_item(&self, item_id: &ReceiptItemId) -> Option<&ReceiptItem> {
        self.items.iter().find(|item| item.id == *item_id)
    }
}
