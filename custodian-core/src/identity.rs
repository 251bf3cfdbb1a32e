//! Identity types for custodian records

use crate::fields::FieldMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Record identifier assigned by the record store on creation.
///
/// The zero value is a sentinel meaning "never persisted"; real
/// identities start at 1 and are immutable once assigned.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CustomerId(u64);

impl CustomerId {
    /// Sentinel identity for a record the store has never persisted.
    pub const UNASSIGNED: CustomerId = CustomerId(0);

    /// Wrap a raw store-assigned identifier.
    pub const fn new(raw: u64) -> Self {
        CustomerId(raw)
    }

    /// Raw integer value.
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Whether the store has assigned this identity.
    pub const fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CustomerId {
    fn from(raw: u64) -> Self {
        CustomerId(raw)
    }
}

/// Record type discriminator for polymorphic dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Customer,
}

/// Capability trait exposing a record's kind, identity, and published
/// field names.
///
/// Entities embed their identity value and expose it here instead of
/// inheriting it from a shared base type.
pub trait DomainRecord {
    /// The discriminator for this record type.
    fn kind() -> RecordKind;

    /// The store-assigned identity of this record.
    fn record_id(&self) -> CustomerId;

    /// Mapping from internal field identifiers to the names published to
    /// API consumers.
    fn field_map() -> FieldMap;
}
