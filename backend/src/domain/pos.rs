//! Point-of-sale aggregate.
//!
//! A POS exists in two shapes. [`PosDraft`] has no store-assigned timestamps
//! and only carries an id when it targets an existing record. [`Pos`] is what
//! the store hands back: id, creation and update timestamps are always
//! present. Both wrap the same validated [`PosDetails`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of outlet a POS represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PosType {
    Cafe,
    Bakery,
    Cafeteria,
    VendingMachine,
}

/// University campus a POS belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampusType {
    Altstadt,
    Bergheim,
    Inf,
}

/// Error returned when a stored enum label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} label '{label}'")]
pub struct UnknownLabelError {
    kind: &'static str,
    label: String,
}

macro_rules! labelled_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            /// Stable upper-case label used in storage and logs.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownLabelError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                match raw {
                    $($label => Ok(Self::$variant),)+
                    other => Err(UnknownLabelError {
                        kind: $kind,
                        label: other.to_owned(),
                    }),
                }
            }
        }
    };
}

labelled_enum!(PosType, "pos type", {
    Cafe => "CAFE",
    Bakery => "BAKERY",
    Cafeteria => "CAFETERIA",
    VendingMachine => "VENDING_MACHINE",
});

labelled_enum!(CampusType, "campus", {
    Altstadt => "ALTSTADT",
    Bergheim => "BERGHEIM",
    Inf => "INF",
});

/// Validation errors returned when building POS values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosValidationError {
    EmptyName,
    EmptyDescription,
    UpdatedBeforeCreated,
}

impl fmt::Display for PosValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "pos name must not be empty"),
            Self::EmptyDescription => write!(f, "pos description must not be empty"),
            Self::UpdatedBeforeCreated => {
                write!(f, "pos update timestamp precedes its creation timestamp")
            }
        }
    }
}

impl std::error::Error for PosValidationError {}

/// Descriptive content shared by drafts and persisted POS records.
///
/// Address fields are copied verbatim from the source and may be empty
/// strings; only `name` and `description` are checked for content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosDetails {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub pos_type: PosType,
    pub campus: CampusType,
    pub street: String,
    pub house_number: String,
    pub postal_code: i32,
    pub city: String,
    /// Originating OpenStreetMap node, absent for manually created records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub osm_node_id: Option<i64>,
}

impl PosDetails {
    fn validate(&self) -> Result<(), PosValidationError> {
        if self.name.trim().is_empty() {
            return Err(PosValidationError::EmptyName);
        }
        if self.description.trim().is_empty() {
            return Err(PosValidationError::EmptyDescription);
        }
        Ok(())
    }
}

/// A POS that has not been written by the store yet.
///
/// # Examples
/// ```
/// use campus_coffee_backend::domain::{CampusType, PosDetails, PosDraft, PosType};
///
/// let draft = PosDraft::new(PosDetails {
///     name: "Cafe Botanik".to_owned(),
///     description: "Cafe Botanik".to_owned(),
///     pos_type: PosType::Cafe,
///     campus: CampusType::Altstadt,
///     street: "Im Neuenheimer Feld".to_owned(),
///     house_number: "304".to_owned(),
///     postal_code: 69120,
///     city: "Heidelberg".to_owned(),
///     osm_node_id: None,
/// })?;
/// assert!(draft.id().is_none());
/// assert_eq!(draft.with_id(3).id(), Some(3));
/// # Ok::<(), campus_coffee_backend::domain::PosValidationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosDraft {
    id: Option<i64>,
    details: PosDetails,
}

impl PosDraft {
    /// Create a draft for a new record.
    pub fn new(details: PosDetails) -> Result<Self, PosValidationError> {
        details.validate()?;
        Ok(Self { id: None, details })
    }

    /// Target an existing record, turning the upsert into an update.
    #[must_use]
    pub fn with_id(self, id: i64) -> Self {
        Self {
            id: Some(id),
            details: self.details,
        }
    }

    /// Identity of the record to update, if any.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn details(&self) -> &PosDetails {
        &self.details
    }

    pub fn name(&self) -> &str {
        self.details.name.as_str()
    }

}

/// A POS as persisted by the store.
///
/// ## Invariants
/// - `id`, `created_at` and `updated_at` are assigned by the store.
/// - `updated_at` is never earlier than `created_at`.
///
/// Deserialisation goes through [`Pos::new`], so payloads breaking either
/// invariant or carrying blank text are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PosDto", into = "PosDto")]
pub struct Pos {
    id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    details: PosDetails,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PosDto {
    id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(flatten)]
    details: PosDetails,
}

impl From<Pos> for PosDto {
    fn from(Pos { id, created_at, updated_at, details }: Pos) -> Self {
        Self {
            id,
            created_at,
            updated_at,
            details,
        }
    }
}

impl TryFrom<PosDto> for Pos {
    type Error = PosValidationError;

    fn try_from(dto: PosDto) -> Result<Self, Self::Error> {
        Self::new(dto.id, dto.created_at, dto.updated_at, dto.details)
    }
}

impl Pos {
    /// Rehydrate a persisted record. Store adapters are the only callers.
    pub fn new(
        id: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        details: PosDetails,
    ) -> Result<Self, PosValidationError> {
        details.validate()?;
        if updated_at < created_at {
            return Err(PosValidationError::UpdatedBeforeCreated);
        }
        Ok(Self {
            id,
            created_at,
            updated_at,
            details,
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn details(&self) -> &PosDetails {
        &self.details
    }

    pub fn name(&self) -> &str {
        self.details.name.as_str()
    }

    pub fn osm_node_id(&self) -> Option<i64> {
        self.details.osm_node_id
    }

    /// Draft that updates this record in place.
    pub fn to_draft(&self) -> PosDraft {
        PosDraft {
            id: Some(self.id),
            details: self.details.clone(),
        }
    }
}
