//! Receipt-specific error types.
//!
//! Errors raised by the apportionment engine and the assignment
//! orchestrator. Quantity and emptiness violations are validation
//! failures; missing aggregates are not-found failures.

use crate::domain::foundation::{
    DomainError, ErrorCode, MemberId, ReceiptId, ReceiptItemId, ValidationError,
};
use rust_decimal::Decimal;

/// Receipt assignment errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ReceiptError {
    /// An item was submitted with no assignments.
    EmptyAssignments(ReceiptItemId),

    /// Assigned quantities exceed the item's quantity.
    QuantityExceeded {
        item_id: ReceiptItemId,
        assigned: Decimal,
        available: u32,
    },

    /// Receipt was not found.
    ReceiptNotFound(ReceiptId),

    /// Referenced item does not belong to the receipt (or does not exist).
    ItemNotFound(ReceiptItemId),

    /// Referenced member does not exist in the receipt's household.
    MemberNotFound(MemberId),

    /// Input value failed validation.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl ReceiptError {
    pub fn empty_assignments(item_id: ReceiptItemId) -> Self {
        ReceiptError::EmptyAssignments(item_id)
    }

    pub fn quantity_exceeded(item_id: ReceiptItemId, assigned: Decimal, available: u32) -> Self {
        ReceiptError::QuantityExceeded {
            item_id,
            assigned,
            available,
        }
    }

    pub fn receipt_not_found(id: ReceiptId) -> Self {
        ReceiptError::ReceiptNotFound(id)
    }

    pub fn item_not_found(id: ReceiptItemId) -> Self {
        ReceiptError::ItemNotFound(id)
    }

    pub fn member_not_found(id: MemberId) -> Self {
        ReceiptError::MemberNotFound(id)
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ReceiptError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        ReceiptError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ReceiptError::EmptyAssignments(_)
            | ReceiptError::QuantityExceeded { .. }
            | ReceiptError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            ReceiptError::ReceiptNotFound(_) => ErrorCode::ReceiptNotFound,
            ReceiptError::ItemNotFound(_) => ErrorCode::ReceiptItemNotFound,
            ReceiptError::MemberNotFound(_) => ErrorCode::MemberNotFound,
            ReceiptError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            ReceiptError::EmptyAssignments(item_id) => {
                format!("Item {} has no assignments", item_id)
            }
            ReceiptError::QuantityExceeded {
                item_id,
                assigned,
                available,
            } => format!(
                "Assigned quantity {} exceeds item {} quantity of {}",
                assigned, item_id, available
            ),
            ReceiptError::ReceiptNotFound(id) => format!("Receipt not found: {}", id),
            ReceiptError::ItemNotFound(id) => format!("Receipt item not found: {}", id),
            ReceiptError::MemberNotFound(id) => {
                format!("Household member not found: {}", id)
            }
            ReceiptError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            ReceiptError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for ReceiptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ReceiptError {}

impl From<ValidationError> for ReceiptError {
    fn from(err: ValidationError) -> Self {
        match &err {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::Negative { field, .. }
            | ValidationError::InvalidFormat { field, .. } => ReceiptError::ValidationFailed {
                field: field.clone(),
                message: err.to_string(),
            },
        }
    }
}

impl From<DomainError> for ReceiptError {
    fn from(err: DomainError) -> Self {
        ReceiptError::Infrastructure(err.to_string())
    }
}

impl From<ReceiptError> for DomainError {
    fn from(err: ReceiptError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn quantity_exceeded_maps_to_validation_code() {
        let err = ReceiptError::quantity_exceeded(ReceiptItemId::new(), dec!(3.5), 3);
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert!(err.message().contains("3.5"));
    }

    #[test]
    fn empty_assignments_maps_to_validation_code() {
        let err = ReceiptError::empty_assignments(ReceiptItemId::new());
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }

    #[test]
    fn not_found_variants_map_to_not_found_codes() {
        assert_eq!(
            ReceiptError::receipt_not_found(ReceiptId::new()).code(),
            ErrorCode::ReceiptNotFound
        );
        assert_eq!(
            ReceiptError::item_not_found(ReceiptItemId::new()).code(),
            ErrorCode::ReceiptItemNotFound
        );
        assert_eq!(
            ReceiptError::member_not_found(MemberId::new()).code(),
            ErrorCode::MemberNotFound
        );
    }

    #[test]
    fn converts_to_domain_error() {
        let id = ReceiptId::new();
        let err = ReceiptError::receipt_not_found(id);
        let domain_err: DomainError = err.clone().into();
        assert_eq!(domain_err.code, err.code());
        assert!(domain_err.message.contains(&id.to_string()));
    }

    #[test]
    fn converts_from_validation_error() {
        let err: ReceiptError = ValidationError::negative("tax_rate", "-0.1").into();
        assert!(matches!(
            err,
            ReceiptError::ValidationFailed { ref field, .. } if field == "tax_rate"
        ));
    }

    #[test]
    fn display_matches_message() {
        let err = ReceiptError::infrastructure("connection lost");
        assert_eq!(format!("{}", err), err.message());
    }
}
