//! Core entity structures

use crate::fields::FieldMap;
use crate::identity::{CustomerId, DomainRecord, RecordKind};
use crate::validation::{Constraint, FieldRule};
use serde::{Deserialize, Serialize};

/// Customer - the business record managed by the gateway.
///
/// The identity is assigned by the record store on creation and never
/// changes afterwards; a freshly built customer carries
/// [`CustomerId::UNASSIGNED`]. Wire names use camelCase, which is why the
/// published field map below is not the identity mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Customer {
    /// Published wire names for the customer's fields.
    pub const FIELD_MAP: FieldMap = FieldMap::new(&[
        ("id", "id"),
        ("first_name", "firstName"),
        ("last_name", "lastName"),
        ("email", "email"),
    ]);

    /// Structural constraints evaluated before every write.
    ///
    /// The id carries no rule here: the unsigned identity type already
    /// rules out negative values.
    pub const FIELD_RULES: &'static [FieldRule] = &[
        FieldRule::new(
            "first_name",
            Constraint::NotBlank,
            "first name must be populated",
        ),
        FieldRule::new(
            "last_name",
            Constraint::NotBlank,
            "last name must be populated",
        ),
        FieldRule::new("email", Constraint::NotBlank, "email must be populated"),
        FieldRule::new("email", Constraint::EmailFormat, "email must be valid"),
    ];

    /// Build an unpersisted customer. The email is normalized to
    /// lowercase so uniqueness checks and cache lookups agree on case.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Customer {
            id: CustomerId::UNASSIGNED,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into().to_lowercase(),
        }
    }

    /// This customer carrying the given identity.
    pub fn with_id(mut self, id: CustomerId) -> Self {
        self.id = id;
        self
    }

    /// Text value of a rule-addressable field, by internal name.
    pub fn text_field(&self, field: &str) -> Option<&str> {
        match field {
            "first_name" => Some(&self.first_name),
            "last_name" => Some(&self.last_name),
            "email" => Some(&self.email),
            _ => None,
        }
    }
}

impl DomainRecord for Customer {
    fn kind() -> RecordKind {
        RecordKind::Customer
    }

    fn record_id(&self) -> CustomerId {
        self.id
    }

    fn field_map() -> FieldMap {
        Customer::FIELD_MAP
    }
}
