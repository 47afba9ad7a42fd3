//! Receipt item assignment rows and per-member aggregation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AssignmentId, MemberId, Money, Quantity, ReceiptItemId};

use super::Allocation;

/// The persisted record of one member's share of one receipt item.
///
/// All amounts are computed by the apportionment engine, never supplied
/// by callers. Rows are replaced wholesale on re-assignment rather than
/// updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItemAssignment {
    pub id: AssignmentId,
    pub item_id: ReceiptItemId,
    pub member_id: MemberId,
    pub quantity: Quantity,
    pub base_amount: Money,
    pub service_charge_amount: Money,
    pub tax_amount: Money,
    pub total_amount: Money,
}

impl ReceiptItemAssignment {
    /// Materializes an allocation into a persistable row.
    pub fn from_allocation(item_id: ReceiptItemId, allocation: &Allocation) -> Self {
        Self {
            id: AssignmentId::new(),
            item_id,
            member_id: allocation.member_id,
            quantity: allocation.quantity,
            base_amount: allocation.base_amount,
            service_charge_amount: allocation.service_charge_amount,
            tax_amount: allocation.tax_amount,
            total_amount: allocation.total_amount,
        }
    }
}

/// A member's aggregate across all assignments on one receipt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemberReceiptTotal {
    pub member_id: MemberId,
    pub base_amount: Money,
    pub service_charge_amount: Money,
    pub tax_amount: Money,
    pub total_amount: Money,
}

impl MemberReceiptTotal {
    fn zero(member_id: MemberId) -> Self {
        Self {
            member_id,
            base_amount: Money::ZERO,
            service_charge_amount: Money::ZERO,
            tax_amount: Money::ZERO,
            total_amount: Money::ZERO,
        }
    }
}

/// Sums assignment rows into per-member totals.
///
/// Members absent from `assignments` are absent from the result; a zero
/// total must be represented by the caller where needed (e.g. when
/// computing re-assignment deltas).
pub fn member_totals(
    assignments: &[ReceiptItemAssignment],
) -> HashMap<MemberId, MemberReceiptTotal> {
    let mut totals: HashMap<MemberId, MemberReceiptTotal> = HashMap::new();
    for assignment in assignments {
        let entry = totals
            .entry(assignment.member_id)
            .or_insert_with(|| MemberReceiptTotal::zero(assignment.member_id));
        entry.base_amount += assignment.base_amount;
        entry.service_charge_amount += assignment.service_charge_amount;
        entry.tax_amount += assignment.tax_amount;
        entry.total_amount += assignment.total_amount;
    }
    totals
}
