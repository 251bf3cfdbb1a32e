//! Validation pipeline for customer writes.
//!
//! Structural rules are a statically declared per-field table evaluated
//! through the entity's text accessor; custom checks plug in through the
//! [`Validator`] trait and are registered explicitly, in order, at
//! construction time. The engine aggregates every violation from every
//! source before rejecting, so a caller sees all objections at once.

use crate::entities::Customer;
use crate::error::{CustodianResult, FieldViolation, ValidationFailure};
use crate::identity::{DomainRecord, RecordKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Operation context passed to validators.
///
/// Uniqueness rules need it to distinguish "taken by anyone" (create)
/// from "taken by someone else" (update).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationHint {
    Create,
    Update,
    #[default]
    None,
}

/// Declarative per-field constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Field must contain at least one non-whitespace character.
    NotBlank,
    /// Field must look like an email address. Blank values pass;
    /// `NotBlank` owns that objection.
    EmailFormat,
}

/// A structural rule binding a constraint to an internal field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub constraint: Constraint,
    pub message: &'static str,
}

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"));

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl FieldRule {
    /// Declare a rule for a field.
    pub const fn new(field: &'static str, constraint: Constraint, message: &'static str) -> Self {
        FieldRule {
            field,
            constraint,
            message,
        }
    }

    /// Evaluate the rule against a field's text value. A missing value is
    /// treated as blank.
    pub fn check(&self, value: Option<&str>) -> Option<FieldViolation> {
        let value = value.unwrap_or("");
        let failed = match self.constraint {
            Constraint::NotBlank => is_blank(value),
            Constraint::EmailFormat => !is_blank(value) && !EMAIL_RE.is_match(value),
        };
        failed.then(|| FieldViolation::new(self.field, self.message))
    }
}

/// A unit of domain-rule checking.
///
/// Implementations report every violation they find; the engine never
/// lets one validator's findings suppress another's. A validator that
/// cannot check at all (a collaborator failed) returns the hard error
/// instead, which aborts the write before any mutation.
pub trait Validator: Send + Sync {
    /// Whether this validator applies to records of the given kind.
    fn supports(&self, kind: RecordKind) -> bool;

    /// Check a candidate under the given operation context.
    fn validate(
        &self,
        customer: &Customer,
        hint: OperationHint,
    ) -> CustodianResult<Vec<FieldViolation>>;
}

/// Aggregating validation dispatcher.
///
/// Runs the structural rule table first, then every applicable registered
/// validator in registration order, and rejects with a single
/// [`ValidationFailure`] carrying the full ordered list when anything
/// objected. Field names in the failure are the externally published
/// ones.
#[derive(Default)]
pub struct ValidationEngine {
    validators: Vec<Box<dyn Validator>>,
}

impl ValidationEngine {
    /// Engine over an explicit, ordered validator list.
    pub fn new(validators: Vec<Box<dyn Validator>>) -> Self {
        ValidationEngine { validators }
    }

    /// Number of registered validators.
    pub fn validator_count(&self) -> usize {
        self.validators.len()
    }

    /// Approve or reject a candidate.
    ///
    /// An absent candidate is itself a validation failure ("customer is
    /// required"), reported as a single general violation. `Ok(())` is
    /// the only outcome that may be followed by a store write.
    pub fn validate(
        &self,
        candidate: Option<&Customer>,
        hint: OperationHint,
    ) -> CustodianResult<()> {
        let Some(customer) = candidate else {
            return Err(ValidationFailure::general("customer is required").into());
        };

        let kind = Customer::kind();
        let mut violations: Vec<FieldViolation> = Vec::new();

        for rule in Customer::FIELD_RULES {
            if let Some(violation) = rule.check(customer.text_field(rule.field)) {
                violations.push(violation);
            }
        }

        for validator in &self.validators {
            if validator.supports(kind) {
                violations.extend(validator.validate(customer, hint)?);
            }
        }

        if violations.is_empty() {
            return Ok(());
        }

        let map = Customer::field_map();
        let violations: Vec<FieldViolation> = violations
            .into_iter()
            .map(|violation| {
                let external = map.external_name(&violation.field).to_string();
                FieldViolation::new(external, violation.message)
            })
            .collect();

        tracing::debug!(
            kind = ?kind,
            ?hint,
            count = violations.len(),
            "rejecting customer write"
        );
        Err(ValidationFailure::new(format!("validation failed for {:?}", kind), violations).into())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CustodianError;
    use crate::error::StoreError;

    fn make_valid_customer() -> Customer {
        Customer::new("Ada", "Lovelace", "ada@example.com")
    }

    fn expect_failure(result: CustodianResult<()>) -> ValidationFailure {
        match result {
            Err(CustodianError::Validation(failure)) => failure,
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    /// Validator stub that always reports the given violations.
    struct FixedValidator {
        violations: Vec<FieldViolation>,
        applicable: bool,
    }

    impl Validator for FixedValidator {
        fn supports(&self, _kind: RecordKind) -> bool {
            self.applicable
        }

        fn validate(
            &self,
            _customer: &Customer,
            _hint: OperationHint,
        ) -> CustodianResult<Vec<FieldViolation>> {
            Ok(self.violations.clone())
        }
    }

    /// Validator stub whose collaborator is down.
    struct BrokenValidator;

    impl Validator for BrokenValidator {
        fn supports(&self, _kind: RecordKind) -> bool {
            true
        }

        fn validate(
            &self,
            _customer: &Customer,
            _hint: OperationHint,
        ) -> CustodianResult<Vec<FieldViolation>> {
            Err(StoreError::Backend {
                reason: "directory unavailable".to_string(),
            }
            .into())
        }
    }

    #[test]
    fn test_valid_customer_passes() {
        let engine = ValidationEngine::default();
        assert!(engine
            .validate(Some(&make_valid_customer()), OperationHint::Create)
            .is_ok());
    }

    #[test]
    fn test_every_failing_field_is_reported() {
        let engine = ValidationEngine::default();
        let customer = Customer::new("", "", "not-an-email");

        let failure = expect_failure(engine.validate(Some(&customer), OperationHint::Create));
        assert_eq!(failure.violations.len(), 3);
        assert_eq!(failure.fields(), vec!["firstName", "lastName", "email"]);
    }

    #[test]
    fn test_blank_email_yields_single_violation() {
        let engine = ValidationEngine::default();
        let customer = Customer::new("Ada", "Lovelace", "  ");

        let failure = expect_failure(engine.validate(Some(&customer), OperationHint::Create));
        assert_eq!(failure.violations.len(), 1);
        assert_eq!(failure.violations[0].field, "email");
        assert_eq!(failure.violations[0].message, "email must be populated");
    }

    #[test]
    fn test_malformed_email_rejected() {
        let engine = ValidationEngine::default();
        for email in ["no-at-sign", "two@@x.com", "spaces in@x.com", "no-dot@host"] {
            let customer = Customer::new("Ada", "Lovelace", email);
            let failure = expect_failure(engine.validate(Some(&customer), OperationHint::Create));
            assert_eq!(failure.fields(), vec!["email"], "email: {}", email);
        }
    }

    #[test]
    fn test_absent_candidate_is_general_failure() {
        let engine = ValidationEngine::default();
        let failure = expect_failure(engine.validate(None, OperationHint::Create));
        assert_eq!(failure.violations.len(), 1);
        assert!(failure.violations[0].is_general());
        assert_eq!(failure.violations[0].message, "customer is required");
    }

    #[test]
    fn test_structural_violations_precede_validator_output() {
        let engine = ValidationEngine::new(vec![Box::new(FixedValidator {
            violations: vec![FieldViolation::new("email", "the email is already taken")],
            applicable: true,
        })]);
        let customer = Customer::new("", "Lovelace", "ada@example.com");

        let failure = expect_failure(engine.validate(Some(&customer), OperationHint::Create));
        assert_eq!(failure.fields(), vec!["firstName", "email"]);
        assert_eq!(failure.violations[1].message, "the email is already taken");
    }

    #[test]
    fn test_one_validator_never_suppresses_another() {
        let engine = ValidationEngine::new(vec![
            Box::new(FixedValidator {
                violations: vec![FieldViolation::new("email", "first objection")],
                applicable: true,
            }),
            Box::new(FixedValidator {
                violations: vec![FieldViolation::general("second objection")],
                applicable: true,
            }),
        ]);

        let failure =
            expect_failure(engine.validate(Some(&make_valid_customer()), OperationHint::Create));
        assert_eq!(failure.violations.len(), 2);
        assert_eq!(failure.violations[0].message, "first objection");
        assert_eq!(failure.violations[1].message, "second objection");
    }

    #[test]
    fn test_inapplicable_validator_is_skipped() {
        let engine = ValidationEngine::new(vec![Box::new(FixedValidator {
            violations: vec![FieldViolation::general("should not appear")],
            applicable: false,
        })]);

        assert!(engine
            .validate(Some(&make_valid_customer()), OperationHint::Create)
            .is_ok());
    }

    #[test]
    fn test_broken_validator_fails_closed() {
        let engine = ValidationEngine::new(vec![Box::new(BrokenValidator)]);
        let result = engine.validate(Some(&make_valid_customer()), OperationHint::Create);
        assert!(matches!(result, Err(CustodianError::Store(_))));
    }

    #[test]
    fn test_unmapped_field_falls_back_to_internal_name() {
        let engine = ValidationEngine::new(vec![Box::new(FixedValidator {
            violations: vec![FieldViolation::new("email_domain", "domain is blocked")],
            applicable: true,
        })]);

        let failure =
            expect_failure(engine.validate(Some(&make_valid_customer()), OperationHint::Create));
        assert_eq!(failure.fields(), vec!["email_domain"]);
    }

    #[test]
    fn test_rejection_order_is_deterministic() {
        let engine = ValidationEngine::default();
        let customer = Customer::new("", "", "bad");
        let first = expect_failure(engine.validate(Some(&customer), OperationHint::Create));
        let second = expect_failure(engine.validate(Some(&customer), OperationHint::Create));
        assert_eq!(first, second);
    }

    #[test]
    fn test_default_hint_is_none() {
        assert_eq!(OperationHint::default(), OperationHint::None);
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any value with no '@' at all must fail the email format rule.
        #[test]
        fn prop_email_without_at_sign_rejected(value in "[a-z0-9.]{1,20}") {
            let rule = FieldRule::new("email", Constraint::EmailFormat, "email must be valid");
            prop_assert!(rule.check(Some(&value)).is_some());
        }

        /// Simple well-formed addresses always pass the email format rule.
        #[test]
        fn prop_simple_email_accepted(
            local in "[a-z0-9]{1,10}",
            host in "[a-z0-9]{1,10}",
            tld in "[a-z]{2,6}",
        ) {
            let rule = FieldRule::new("email", Constraint::EmailFormat, "email must be valid");
            let email = format!("{}@{}.{}", local, host, tld);
            prop_assert!(rule.check(Some(&email)).is_none());
        }

        /// Whitespace-only values are blank regardless of length.
        #[test]
        fn prop_whitespace_is_blank(len in 0usize..16) {
            let rule = FieldRule::new("first_name", Constraint::NotBlank, "must be populated");
            let value = " ".repeat(len);
            prop_assert!(rule.check(Some(&value)).is_some());
        }
    }
}
