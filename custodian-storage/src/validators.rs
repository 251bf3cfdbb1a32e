//! Store-backed domain validators.

use crate::CustomerStore;
use custodian_core::{
    Customer, CustodianResult, FieldViolation, OperationHint, RecordKind, Validator,
};
use std::sync::Arc;

/// Rejects a customer whose email is already taken.
///
/// Email comparison ignores ASCII case. Under [`OperationHint::Create`]
/// any existing customer with the same email is a collision; under
/// [`OperationHint::Update`] the record being written is excluded so it
/// can keep its own email. Without a hint no uniqueness check runs.
///
/// A store failure while listing is a hard error: the check fails closed
/// rather than letting a possibly colliding write through.
pub struct UniqueEmailValidator<S> {
    store: Arc<S>,
}

impl<S: CustomerStore> UniqueEmailValidator<S> {
    /// Validator backed by the given store.
    pub fn new(store: Arc<S>) -> Self {
        UniqueEmailValidator { store }
    }
}

impl<S: CustomerStore> Validator for UniqueEmailValidator<S> {
    fn supports(&self, kind: RecordKind) -> bool {
        kind == RecordKind::Customer
    }

    fn validate(
        &self,
        customer: &Customer,
        hint: OperationHint,
    ) -> CustodianResult<Vec<FieldViolation>> {
        let excluded = match hint {
            OperationHint::Create => None,
            OperationHint::Update => Some(customer.id),
            OperationHint::None => return Ok(Vec::new()),
        };

        let taken = self.store.list()?.iter().any(|existing| {
            existing.email.eq_ignore_ascii_case(&customer.email) && Some(existing.id) != excluded
        });

        let mut violations = Vec::new();
        if taken {
            violations.push(FieldViolation::new("email", "the email is already taken"));
        }
        Ok(violations)
    }
}

// ============================================================================
// TESTS
// ============================================================================
