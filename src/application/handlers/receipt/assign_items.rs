//! AssignItemsHandler - Command handler for splitting a receipt's items
//! among household members.
//!
//! Validates every referenced item and member, apportions every item, and
//! only then starts writing: allocation rows are replaced per item and the
//! expenditure counters move by `new aggregate − previous aggregate` for
//! this receipt. The delta form makes re-assignment idempotent: running
//! the same command twice leaves member expenditure untouched.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::foundation::{
    ErrorCode, EventId, MemberId, Money, Rate, ReceiptId, ReceiptItemId,
    SerializableDomainEvent, Timestamp,
};
use crate::domain::receipt::{
    apportion, member_totals, AssignmentShare, MemberReceiptTotal, MemberShareSummary, Receipt,
    ReceiptError, ReceiptItemAssignment, ReceiptItemsAssigned,
};
use crate::ports::{AssignmentRepository, EventPublisher, MemberRepository, ReceiptReader};

/// Bounded retries for the optimistic-concurrency loop on member counters.
const MAX_VERSION_RETRIES: usize = 5;

/// Requested split of one item.
#[derive(Debug, Clone)]
pub struct ItemAssignmentRequest {
    pub item_id: ReceiptItemId,
    pub shares: Vec<AssignmentShare>,
}

/// Command to assign a receipt's items to members.
///
/// Rates are supplied per call; the caller is assumed pre-authorized for
/// the receipt's household by the external access checker.
#[derive(Debug, Clone)]
pub struct AssignReceiptItemsCommand {
    pub receipt_id: ReceiptId,
    pub items: Vec<ItemAssignmentRequest>,
    pub service_charge_rate: Rate,
    pub tax_rate: Rate,
}

/// Result of a successful assignment: per-member totals for the receipt.
#[derive(Debug, Clone)]
pub struct ReceiptAssignmentView {
    pub receipt_id: ReceiptId,
    pub member_totals: Vec<MemberReceiptTotal>,
}

/// Handler for assigning receipt items to members.
pub struct AssignItemsHandler {
    receipt_reader: Arc<dyn ReceiptReader>,
    assignment_repository: Arc<dyn AssignmentRepository>,
    member_repository: Arc<dyn MemberRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl AssignItemsHandler {
    pub fn new(
        receipt_reader: Arc<dyn ReceiptReader>,
        assignment_repository: Arc<dyn AssignmentRepository>,
        member_repository: Arc<dyn MemberRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            receipt_reader,
            assignment_repository,
            member_repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: AssignReceiptItemsCommand,
    ) -> Result<ReceiptAssignmentView, ReceiptError> {
        let now = Timestamp::now();

        // 1. Load the receipt and resolve every referenced item
        let receipt = self
            .receipt_reader
            .get_by_id(&cmd.receipt_id)
            .await?
            .ok_or(ReceiptError::ReceiptNotFound(cmd.receipt_id))?;

        // 2. Apportion every item before touching storage; any validation
        //    failure must leave prior state intact
        let mut replacements: Vec<(ReceiptItemId, Vec<ReceiptItemAssignment>)> = Vec::new();
        for request in &cmd.items {
            let item = receipt
                .find_item(&request.item_id)
                .ok_or(ReceiptError::ItemNotFound(request.item_id))?;
            let allocations = apportion(
                item,
                &request.shares,
                cmd.service_charge_rate,
                cmd.tax_rate,
            )?;
            let rows = allocations
                .iter()
                .map(|allocation| ReceiptItemAssignment::from_allocation(item.id, allocation))
                .collect();
            replacements.push((item.id, rows));
        }

        // 3. Every assigned member must exist in the receipt's household
        let member_ids: HashSet<MemberId> = cmd
            .items
            .iter()
            .flat_map(|request| request.shares.iter().map(|share| share.member_id))
            .collect();
        for member_id in &member_ids {
            let member = self
                .member_repository
                .find_by_id(member_id)
                .await?
                .ok_or(ReceiptError::MemberNotFound(*member_id))?;
            if member.household_id != receipt.household_id {
                return Err(ReceiptError::MemberNotFound(*member_id));
            }
        }

        // 4. Capture the previous per-member aggregate for the whole receipt
        let previous = member_totals(&self.load_receipt_rows(&receipt).await?);

        // 5. Replace allocations item by item (delete-then-insert per item)
        for (item_id, rows) in replacements {
            self.assignment_repository
                .replace_for_item(&item_id, rows)
                .await?;
        }

        // 6. Move each member's counters by the aggregate difference
        let current = member_totals(&self.load_receipt_rows(&receipt).await?);
        let affected: HashSet<MemberId> = previous
            .keys()
            .chain(current.keys())
            .copied()
            .collect();
        for member_id in affected {
            let previous_total = previous
                .get(&member_id)
                .map(|t| t.total_amount)
                .unwrap_or(Money::ZERO);
            let current_total = current
                .get(&member_id)
                .map(|t| t.total_amount)
                .unwrap_or(Money::ZERO);
            let delta = current_total - previous_total;
            if delta.is_zero() {
                continue;
            }
            self.apply_expenditure_delta(member_id, delta, now).await?;
        }

        debug!(
            receipt_id = %cmd.receipt_id,
            members = current.len(),
            "Receipt items assigned"
        );

        // 7. Notify progression and read models; never fail the write over it
        let event = ReceiptItemsAssigned {
            event_id: EventId::new(),
            receipt_id: receipt.id,
            household_id: receipt.household_id,
            member_shares: current
                .values()
                .map(|total| MemberShareSummary {
                    member_id: total.member_id,
                    total_amount: total.total_amount,
                })
                .collect(),
            assigned_at: now,
        };
        if let Err(e) = self.event_publisher.publish(event.to_envelope()).await {
            warn!(
                receipt_id = %cmd.receipt_id,
                error = %e,
                "Failed to publish receipt.items_assigned event"
            );
        }

        let mut view_totals: Vec<MemberReceiptTotal> = current.into_values().collect();
        view_totals.sort_by_key(|total| total.member_id.to_string());

        Ok(ReceiptAssignmentView {
            receipt_id: receipt.id,
            member_totals: view_totals,
        })
    }

    /// All assignment rows currently stored for the receipt's items.
    async fn load_receipt_rows(
        &self,
        receipt: &Receipt,
    ) -> Result<Vec<ReceiptItemAssignment>, ReceiptError> {
        let mut rows = Vec::new();
        for item in &receipt.items {
            rows.extend(self.assignment_repository.find_by_item(&item.id).await?);
        }
        Ok(rows)
    }

    /// Applies an expenditure delta with a compare-and-swap retry loop.
    async fn apply_expenditure_delta(
        &self,
        member_id: MemberId,
        delta: Money,
        now: Timestamp,
    ) -> Result<(), ReceiptError> {
        for _ in 0..MAX_VERSION_RETRIES {
            let mut member = self
                .member_repository
                .find_by_id(&member_id)
                .await?
                .ok_or(ReceiptError::MemberNotFound(member_id))?;
            member.add_expenditure(delta, now);
            match self.member_repository.update(&member).await {
                Ok(()) => return Ok(()),
                Err(e) if e.code == ErrorCode::VersionConflict => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(ReceiptError::infrastructure(format!(
            "Expenditure update for member {} kept conflicting",
            member_id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{
        InMemoryAssignmentRepository, InMemoryEventBus, InMemoryMemberRepository,
        InMemoryReceiptStore,
    };
    use crate::domain::foundation::{
        DomainError, EventEnvelope, HouseholdId, Quantity, UserId,
    };
    use crate::domain::household::{HouseholdMember, MemberRole};
    use crate::domain::receipt::{ItemProvenance, Receipt, ReceiptItem};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    struct Fixture {
        receipts: Arc<InMemoryReceiptStore>,
        assignments: Arc<InMemoryAssignmentRepository>,
        members: Arc<InMemoryMemberRepository>,
        bus: Arc<InMemoryEventBus>,
        handler: AssignItemsHandler,
        household_id: HouseholdId,
    }

    impl Fixture {
        fn new() -> Self {
            let receipts = Arc::new(InMemoryReceiptStore::new());
            let assignments = Arc::new(InMemoryAssignmentRepository::new());
            let members = Arc::new(InMemoryMemberRepository::new());
            let bus = Arc::new(InMemoryEventBus::new());
            let handler = AssignItemsHandler::new(
                receipts.clone(),
                assignments.clone(),
                members.clone(),
                bus.clone(),
            );
            Self {
                receipts,
                assignments,
                members,
                bus,
                handler,
                household_id: HouseholdId::new(),
            }
        }

        async fn seed_member(&self, name: &str) -> MemberId {
            let member = HouseholdMember::new(
                MemberId::new(),
                self.household_id,
                UserId::new(name).unwrap(),
                MemberRole::Member,
            );
            let id = member.id;
            self.members.save(&member).await.unwrap();
            id
        }

        fn seed_receipt(&self, item_specs: &[(u32, i64)]) -> (ReceiptId, Vec<ReceiptItemId>) {
            let receipt_id = ReceiptId::new();
            let items: Vec<ReceiptItem> = item_specs
                .iter()
                .enumerate()
                .map(|(line, (quantity, total_cents))| {
                    ReceiptItem::try_new(
                        ReceiptItemId::new(),
                        receipt_id,
                        format!("Item {}", line + 1),
                        *quantity,
                        None,
                        Money::from_cents(*total_cents),
                        (line + 1) as u32,
                        ItemProvenance::Manual,
                    )
                    .unwrap()
                })
                .collect();
            let item_ids = items.iter().map(|i| i.id).collect();
            self.receipts.insert(Receipt {
                id: receipt_id,
                household_id: self.household_id,
                items,
            });
            (receipt_id, item_ids)
        }

        async fn member_expenditure(&self, member_id: &MemberId) -> i64 {
            self.members
                .find_by_id(member_id)
                .await
                .unwrap()
                .unwrap()
                .monthly_expenditure
                .as_cents()
        }
    }

    fn even_split(
        receipt_id: ReceiptId,
        item_id: ReceiptItemId,
        members: &[MemberId],
    ) -> AssignReceiptItemsCommand {
        AssignReceiptItemsCommand {
            receipt_id,
            items: vec![ItemAssignmentRequest {
                item_id,
                shares: members
                    .iter()
                    .map(|member_id| AssignmentShare {
                        member_id: *member_id,
                        quantity: Quantity::ONE,
                    })
                    .collect(),
            }],
            service_charge_rate: Rate::try_new(dec!(0.10)).unwrap(),
            tax_rate: Rate::try_new(dec!(0.08)).unwrap(),
        }
    }

    #[tokio::test]
    async fn assigns_items_and_updates_expenditure() {
        let fixture = Fixture::new();
        let member_a = fixture.seed_member("user-a").await;
        let member_b = fixture.seed_member("user-b").await;
        let (receipt_id, item_ids) = fixture.seed_receipt(&[(2, 2000)]);

        let view = fixture
            .handler
            .handle(even_split(receipt_id, item_ids[0], &[member_a, member_b]))
            .await
            .unwrap();

        // 10.00 base + 1.00 service + 0.88 tax per member
        assert_eq!(view.member_totals.len(), 2);
        for total in &view.member_totals {
            assert_eq!(total.total_amount.as_cents(), 1188);
        }

        assert_eq!(fixture.member_expenditure(&member_a).await, 1188);
        assert_eq!(fixture.member_expenditure(&member_b).await, 1188);

        let rows = fixture.assignments.find_by_item(&item_ids[0]).await.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn aggregates_across_multiple_items() {
        let fixture = Fixture::new();
        let member = fixture.seed_member("user-a").await;
        let (receipt_id, item_ids) = fixture.seed_receipt(&[(1, 1000), (1, 500)]);

        let cmd = AssignReceiptItemsCommand {
            receipt_id,
            items: item_ids
                .iter()
                .map(|item_id| ItemAssignmentRequest {
                    item_id: *item_id,
                    shares: vec![AssignmentShare {
                        member_id: member,
                        quantity: Quantity::ONE,
                    }],
                })
                .collect(),
            service_charge_rate: Rate::ZERO,
            tax_rate: Rate::ZERO,
        };

        let view = fixture.handler.handle(cmd).await.unwrap();

        assert_eq!(view.member_totals.len(), 1);
        assert_eq!(view.member_totals[0].total_amount.as_cents(), 1500);
        assert_eq!(fixture.member_expenditure(&member).await, 1500);
    }

    #[tokio::test]
    async fn reassignment_is_idempotent_for_expenditure() {
        let fixture = Fixture::new();
        let member_a = fixture.seed_member("user-a").await;
        let member_b = fixture.seed_member("user-b").await;
        let (receipt_id, item_ids) = fixture.seed_receipt(&[(2, 2000)]);

        let cmd = even_split(receipt_id, item_ids[0], &[member_a, member_b]);
        fixture.handler.handle(cmd.clone()).await.unwrap();
        let after_first = fixture.member_expenditure(&member_a).await;

        fixture.handler.handle(cmd).await.unwrap();
        let after_second = fixture.member_expenditure(&member_a).await;

        assert_eq!(after_first, after_second);

        // Rows were replaced, not appended
        let rows = fixture.assignments.find_by_item(&item_ids[0]).await.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn reassignment_applies_only_the_delta() {
        let fixture = Fixture::new();
        let member_a = fixture.seed_member("user-a").await;
        let member_b = fixture.seed_member("user-b").await;
        let (receipt_id, item_ids) = fixture.seed_receipt(&[(2, 2000)]);

        // First: everything to A
        let cmd = AssignReceiptItemsCommand {
            receipt_id,
            items: vec![ItemAssignmentRequest {
                item_id: item_ids[0],
                shares: vec![AssignmentShare {
                    member_id: member_a,
                    quantity: Quantity::whole(2).unwrap(),
                }],
            }],
            service_charge_rate: Rate::ZERO,
            tax_rate: Rate::ZERO,
        };
        fixture.handler.handle(cmd).await.unwrap();
        assert_eq!(fixture.member_expenditure(&member_a).await, 2000);

        // Then: split evenly; A's counter comes down, B's goes up
        let cmd = AssignReceiptItemsCommand {
            receipt_id,
            items: vec![ItemAssignmentRequest {
                item_id: item_ids[0],
                shares: vec![
                    AssignmentShare {
                        member_id: member_a,
                        quantity: Quantity::ONE,
                    },
                    AssignmentShare {
                        member_id: member_b,
                        quantity: Quantity::ONE,
                    },
                ],
            }],
            service_charge_rate: Rate::ZERO,
            tax_rate: Rate::ZERO,
        };
        fixture.handler.handle(cmd).await.unwrap();

        assert_eq!(fixture.member_expenditure(&member_a).await, 1000);
        assert_eq!(fixture.member_expenditure(&member_b).await, 1000);
    }

    #[tokio::test]
    async fn fails_when_receipt_missing() {
        let fixture = Fixture::new();
        let member = fixture.seed_member("user-a").await;

        let result = fixture
            .handler
            .handle(even_split(ReceiptId::new(), ReceiptItemId::new(), &[member]))
            .await;

        assert!(matches!(result, Err(ReceiptError::ReceiptNotFound(_))));
    }

    #[tokio::test]
    async fn fails_when_item_not_on_receipt() {
        let fixture = Fixture::new();
        let member = fixture.seed_member("user-a").await;
        let (receipt_id, _) = fixture.seed_receipt(&[(1, 1000)]);

        let result = fixture
            .handler
            .handle(even_split(receipt_id, ReceiptItemId::new(), &[member]))
            .await;

        assert!(matches!(result, Err(ReceiptError::ItemNotFound(_))));
    }

    #[tokio::test]
    async fn fails_when_member_outside_household() {
        let fixture = Fixture::new();
        let (receipt_id, item_ids) = fixture.seed_receipt(&[(1, 1000)]);

        // Member of a different household
        let outsider = HouseholdMember::new(
            MemberId::new(),
            HouseholdId::new(),
            UserId::new("outsider").unwrap(),
            MemberRole::Member,
        );
        fixture.members.save(&outsider).await.unwrap();

        let result = fixture
            .handler
            .handle(even_split(receipt_id, item_ids[0], &[outsider.id]))
            .await;

        assert!(matches!(result, Err(ReceiptError::MemberNotFound(_))));
    }

    #[tokio::test]
    async fn over_assignment_fails_without_writing() {
        let fixture = Fixture::new();
        let member_a = fixture.seed_member("user-a").await;
        let member_b = fixture.seed_member("user-b").await;
        let (receipt_id, item_ids) = fixture.seed_receipt(&[(1, 1000)]);

        let result = fixture
            .handler
            .handle(even_split(receipt_id, item_ids[0], &[member_a, member_b]))
            .await;

        assert!(matches!(
            result,
            Err(ReceiptError::QuantityExceeded { .. })
        ));
        assert_eq!(fixture.member_expenditure(&member_a).await, 0);
        assert!(fixture
            .assignments
            .find_by_item(&item_ids[0])
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn publishes_items_assigned_event() {
        let fixture = Fixture::new();
        let member = fixture.seed_member("user-a").await;
        let (receipt_id, item_ids) = fixture.seed_receipt(&[(1, 1000)]);

        fixture
            .handler
            .handle(even_split(receipt_id, item_ids[0], &[member]))
            .await
            .unwrap();

        let events = fixture.bus.events_of_type("receipt.items_assigned.v1");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].aggregate_id, receipt_id.to_string());
    }

    #[tokio::test]
    async fn publish_failure_does_not_fail_the_write() {
        struct FailingPublisher;

        #[async_trait]
        impl EventPublisher for FailingPublisher {
            async fn publish(&self, _event: EventEnvelope) -> Result<(), DomainError> {
                Err(DomainError::new(
                    ErrorCode::InternalError,
                    "dispatch unavailable",
                ))
            }
            async fn publish_all(
                &self,
                _events: Vec<EventEnvelope>,
            ) -> Result<(), DomainError> {
                Err(DomainError::new(
                    ErrorCode::InternalError,
                    "dispatch unavailable",
                ))
            }
        }

        let receipts = Arc::new(InMemoryReceiptStore::new());
        let assignments = Arc::new(InMemoryAssignmentRepository::new());
        let members = Arc::new(InMemoryMemberRepository::new());
        let handler = AssignItemsHandler::new(
            receipts.clone(),
            assignments,
            members.clone(),
            Arc::new(FailingPublisher),
        );

        let household_id = HouseholdId::new();
        let member = HouseholdMember::new(
            MemberId::new(),
            household_id,
            UserId::new("user-a").unwrap(),
            MemberRole::Member,
        );
        members.save(&member).await.unwrap();

        let receipt_id = ReceiptId::new();
        let item = ReceiptItem::try_new(
            ReceiptItemId::new(),
            receipt_id,
            "Milk",
            1,
            None,
            Money::from_cents(350),
            1,
            ItemProvenance::Manual,
        )
        .unwrap();
        let item_id = item.id;
        receipts.insert(Receipt {
            id: receipt_id,
            household_id,
            items: vec![item],
        });

        let result = handler
            .handle(even_split(receipt_id, item_id, &[member.id]))
            .await;

        assert!(result.is_ok());
        let stored = members.find_by_id(&member.id).await.unwrap().unwrap();
        assert_eq!(stored.monthly_expenditure.as_cents(), 350);
    }
}
