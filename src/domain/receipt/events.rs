//! Receipt and expense domain events.
//!
//! `ReceiptItemsAssigned` is published by the assignment orchestrator
//! after allocations and expenditure counters are written. `ExpenseLogged`
//! and `ReceiptScanned` are published by the surrounding write paths
//! (expense creation, receipt confirmation) and drive quest progression.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, EventId, HouseholdId, MemberId, Money, ReceiptId, SpendingCategory, Timestamp,
    UserId,
};

/// One member's share of a receipt, summarized for the event payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemberShareSummary {
    pub member_id: MemberId,
    pub total_amount: Money,
}

/// Published when a receipt's items have been assigned to members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptItemsAssigned {
    /// Unique event identifier for deduplication.
    pub event_id: EventId,
    /// The receipt whose items were assigned.
    pub receipt_id: ReceiptId,
    /// Household owning the receipt.
    pub household_id: HouseholdId,
    /// Per-member totals across the whole receipt.
    pub member_shares: Vec<MemberShareSummary>,
    /// When the assignment was written.
    pub assigned_at: Timestamp,
}

domain_event!(
    ReceiptItemsAssigned,
    event_type = "receipt.items_assigned.v1",
    schema_version = 1,
    aggregate_id = receipt_id,
    aggregate_type = "Receipt",
    occurred_at = assigned_at,
    event_id = event_id
);

/// Published when a user logs an expense.
///
/// Emitted by the expense write path outside this core; consumed here to
/// advance matching quests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseLogged {
    /// Unique event identifier for deduplication.
    pub event_id: EventId,
    /// Household the expense belongs to.
    pub household_id: HouseholdId,
    /// User who logged the expense.
    pub user_id: UserId,
    /// Spending category of the expense.
    pub category: SpendingCategory,
    /// Expense amount.
    pub amount: Money,
    /// When the expense was logged.
    pub logged_at: Timestamp,
}

domain_event!(
    ExpenseLogged,
    event_type = "expense.logged.v1",
    schema_version = 1,
    aggregate_id = household_id,
    aggregate_type = "Household",
    occurred_at = logged_at,
    event_id = event_id
);

/// Published when a user scans a receipt.
///
/// Emitted by the OCR/confirmation path outside this core; carries no
/// spending category, so only category-agnostic quests advance from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptScanned {
    /// Unique event identifier for deduplication.
    pub event_id: EventId,
    /// The scanned receipt.
    pub receipt_id: ReceiptId,
    /// Household the receipt belongs to.
    pub household_id: HouseholdId,
    /// User who scanned the receipt.
    pub user_id: UserId,
    /// When the scan completed.
    pub scanned_at: Timestamp,
}

domain_event!(
    ReceiptScanned,
    event_type = "receipt.scanned.v1",
    schema_version = 1,
    aggregate_id = receipt_id,
    aggregate_type = "Receipt",
    occurred_at = scanned_at,
    event_id = event_id
);
