//! Custodian Core - record, error, and validation types
//!
//! Pure domain layer for the custodian gateway: the customer record, the
//! error taxonomy, the externally-published field mapping, and the
//! aggregating validation pipeline. Storage ports, cache adapters, and
//! the gateway itself live in `custodian-storage`.

pub mod entities;
pub mod error;
pub mod fields;
pub mod identity;
pub mod validation;

pub use entities::Customer;
pub use error::{
    CacheError, ConfigError, CustodianError, CustodianResult, FieldViolation, StoreError,
    ValidationFailure, GENERAL_FIELD,
};
pub use fields::FieldMap;
pub use identity::{CustomerId, DomainRecord, RecordKind};
pub use validation::{Constraint, FieldRule, OperationHint, ValidationEngine, Validator};
