//! Monetary apportionment engine.
//!
//! Splits one receipt line item among household members by assigned
//! quantity, applying service charge and tax per share. Each share is
//! rounded to cents with round-half-to-even, then the rounding residual
//! is reconciled so the allocations always sum exactly to the item's
//! grand total.
//!
//! Tax is computed on the post-service-charge amount. That policy comes
//! from the billing rules this engine implements; do not change it to
//! tax-on-base without product confirmation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MemberId, Money, Quantity, Rate};

use super::{ReceiptError, ReceiptItem};

/// Tolerance for fractional quantity sums (e.g. thirds entered as 0.333333).
fn quantity_epsilon() -> Decimal {
    Decimal::new(1, 6)
}

/// One member's share of an item, as requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssignmentShare {
    pub member_id: MemberId,
    pub quantity: Quantity,
}

/// One member's computed allocation for an item.
///
/// `total_amount == base_amount + service_charge_amount + tax_amount`
/// holds for every allocation, including the one carrying the rounding
/// residual (the residual is folded into both base and total).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub member_id: MemberId,
    pub quantity: Quantity,
    pub base_amount: Money,
    pub service_charge_amount: Money,
    pub tax_amount: Money,
    pub total_amount: Money,
}

/// Splits an item's price across the given shares.
///
/// Per-unit price is `total_price / quantity`. For each share:
/// base = round2(per_unit × qty), service = round2(base × service_rate),
/// tax = round2((base + service) × tax_rate), total = base + service + tax.
/// All rounding is half-to-even.
///
/// After rounding every share independently, the sum can drift from the
/// item's true grand total by a cent or two. The difference is applied to
/// the share with the largest quantity (first in input order on ties); if
/// subtracting would take that share below zero, the leftover cents roll
/// over to the next-largest share. Either way
/// `sum(total_amount) == round2(assigned_base × (1 + service) × (1 + tax))`
/// always holds, where `assigned_base` is the item total when the item is
/// fully assigned and `per_unit × Σ quantity` otherwise.
///
/// # Errors
///
/// - `EmptyAssignments` when `shares` is empty
/// - `QuantityExceeded` when assigned quantities sum past the item quantity
///   (beyond a 1e-6 tolerance for fractional entry)
pub fn apportion(
    item: &ReceiptItem,
    shares: &[AssignmentShare],
    service_charge_rate: Rate,
    tax_rate: Rate,
) -> Result<Vec<Allocation>, ReceiptError> {
    if shares.is_empty() {
        return Err(ReceiptError::empty_assignments(item.id));
    }

    let item_quantity = Decimal::from(item.quantity);
    let assigned_quantity: Decimal = shares.iter().map(|s| s.quantity.as_decimal()).sum();
    if assigned_quantity > item_quantity + quantity_epsilon() {
        return Err(ReceiptError::quantity_exceeded(
            item.id,
            assigned_quantity,
            item.quantity,
        ));
    }

    let per_unit = item.total_price.amount() / item_quantity;

    let mut allocations: Vec<Allocation> = shares
        .iter()
        .map(|share| {
            let base = Money::from_decimal(per_unit * share.quantity.as_decimal());
            let service =
                Money::from_decimal(base.amount() * service_charge_rate.as_decimal());
            let tax =
                Money::from_decimal((base + service).amount() * tax_rate.as_decimal());
            Allocation {
                member_id: share.member_id,
                quantity: share.quantity,
                base_amount: base,
                service_charge_amount: service,
                tax_amount: tax,
                total_amount: base + service + tax,
            }
        })
        .collect();

    // Reconcile independent per-share rounding against the true grand total.
    let fully_assigned = (item_quantity - assigned_quantity).abs() <= quantity_epsilon();
    let assigned_base = if fully_assigned {
        item.total_price.amount()
    } else {
        per_unit * assigned_quantity
    };
    let grand_total = Money::from_decimal(
        assigned_base * service_charge_rate.one_plus() * tax_rate.one_plus(),
    );
    let allocated: Money = allocations.iter().map(|a| a.total_amount).sum();
    let residual = grand_total - allocated;

    if !residual.is_zero() {
        // Largest quantity first; input order breaks ties
        let mut order: Vec<usize> = (0..allocations.len()).collect();
        order.sort_by(|&a, &b| {
            allocations[b]
                .quantity
                .cmp(&allocations[a].quantity)
                .then(a.cmp(&b))
        });

        let mut remaining = residual;
        for index in order {
            if remaining.is_zero() {
                break;
            }
            let allocation = &mut allocations[index];
            // A negative residual never takes an allocation below zero;
            // any leftover moves on to the next share
            let applied = if remaining.is_negative() {
                -std::cmp::min(-remaining, allocation.total_amount)
            } else {
                remaining
            };
            allocation.total_amount += applied;
            allocation.base_amount += applied;
            if allocation.base_amount.is_negative() {
                // Sub-cent rows can have charge-heavy totals; keep every
                // component non-negative by folding the overshoot into
                // tax, then service charge
                let shortfall = -allocation.base_amount;
                allocation.base_amount = Money::ZERO;
                let from_tax = std::cmp::min(shortfall, allocation.tax_amount);
                allocation.tax_amount -= from_tax;
                allocation.service_charge_amount -= shortfall - from_tax;
            }
            remaining -= applied;
        }
    }

    Ok(allocations)
}
