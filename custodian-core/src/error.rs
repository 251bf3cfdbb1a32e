//! Error types for custodian operations

use crate::identity::{CustomerId, RecordKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Sentinel field name carried by object-level validation errors.
pub const GENERAL_FIELD: &str = "general";

/// Record store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found: {kind:?} with id {id}")]
    NotFound { kind: RecordKind, id: CustomerId },

    #[error("insert failed for {kind:?}: {reason}")]
    InsertFailed { kind: RecordKind, reason: String },

    #[error("update failed for {kind:?} with id {id}: {reason}")]
    UpdateFailed {
        kind: RecordKind,
        id: CustomerId,
        reason: String,
    },

    #[error("store backend failure: {reason}")]
    Backend { reason: String },

    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Cache layer errors.
///
/// Cache faults are degradations, not failures: the gateway logs them and
/// keeps serving from the record store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache backend failure: {reason}")]
    Backend { reason: String },

    #[error("cache lock poisoned")]
    LockPoisoned,
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// A single field-addressable validation violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Field the violation is scoped to, or [`GENERAL_FIELD`] for
    /// object-level errors.
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

impl FieldViolation {
    /// Violation scoped to a named field.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldViolation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Object-level violation carrying the general sentinel field.
    pub fn general(message: impl Into<String>) -> Self {
        FieldViolation {
            field: GENERAL_FIELD.to_string(),
            message: message.into(),
        }
    }

    /// Whether this violation is object-level rather than field-scoped.
    pub fn is_general(&self) -> bool {
        self.field == GENERAL_FIELD
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Aggregated validation failure.
///
/// Carries every violation collected across all validators in one pass;
/// a write is rejected as a single atomic decision the moment this list
/// is non-empty.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("{summary}")]
pub struct ValidationFailure {
    /// Summary message for the whole rejection.
    pub summary: String,
    /// Ordered list of individual violations.
    pub violations: Vec<FieldViolation>,
}

impl ValidationFailure {
    /// Failure carrying a full violation list.
    pub fn new(summary: impl Into<String>, violations: Vec<FieldViolation>) -> Self {
        ValidationFailure {
            summary: summary.into(),
            violations,
        }
    }

    /// Failure carrying a single object-level violation.
    pub fn general(message: impl Into<String>) -> Self {
        let message = message.into();
        ValidationFailure {
            summary: message.clone(),
            violations: vec![FieldViolation::general(message)],
        }
    }

    /// Fields named by the violations, in order.
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

/// Master error type for all custodian operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CustodianError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationFailure),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for custodian operations.
pub type CustodianResult<T> = Result<T, CustodianError>;

// =============================================================================
// TESTS
// =============================================================================
