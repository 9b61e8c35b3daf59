//! Domain types for contacts, cells and the derived member genealogy.
//!
//! [`ContactRecord`] and [`CellRecord`] are the records supplied by the data
//! store. [`MemberNode`] is the denormalized, derived view used by the
//! genealogy pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder shown when a contact has no (resolvable) cell.
pub const NO_CELL: &str = "no cell";

/// Placeholder shown when a contact has no (resolvable) cell leader.
pub const NO_LEADER: &str = "no leader";

/// Unique identifier for a contact
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub String);

impl ContactId {
    /// Create a new contact ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ContactId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ContactId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Unique identifier for a cell group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(pub String);

impl CellId {
    /// Create a new cell ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a contact stands in the community
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    /// Contact registered but not yet followed up
    #[default]
    Pending,

    /// Attends but is not a member
    Visitor,

    /// Full member
    Member,
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Visitor => "visitor",
            Self::Member => "member",
        };
        write!(f, "{s}")
    }
}

/// A contact as supplied by the data store.
///
/// Only `id` and `name` are required when loading; the edit form enforces
/// more (see [`crate::edit::ContactForm::validate`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    /// Unique identifier
    pub id: ContactId,

    /// Display name
    pub name: String,

    /// Contact number
    #[serde(default)]
    pub whatsapp: String,

    /// Neighborhood of residence
    #[serde(default)]
    pub neighborhood: String,

    /// Reference to a city record
    #[serde(default)]
    pub city_id: Option<String>,

    /// Birth date
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,

    /// Attended an "encounter with God" retreat
    #[serde(default)]
    pub encounter_with_god: bool,

    /// Baptized
    #[serde(default)]
    pub baptized: bool,

    /// One of the founding members
    #[serde(default)]
    pub founder: bool,

    /// Membership status
    #[serde(default)]
    pub status: ContactStatus,

    /// Cell group the contact belongs to
    #[serde(default)]
    pub cell_id: Option<CellId>,

    /// Member who introduced this contact
    #[serde(default)]
    pub referred_by: Option<ContactId>,

    /// Reference returned by the photo uploader
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl ContactRecord {
    /// Create a pending contact with only the required fields set.
    pub fn new(id: impl Into<ContactId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            whatsapp: String::new(),
            neighborhood: String::new(),
            city_id: None,
            birth_date: None,
            encounter_with_god: false,
            baptized: false,
            founder: false,
            status: ContactStatus::Pending,
            cell_id: None,
            referred_by: None,
            photo_url: None,
        }
    }

    /// Check the fields every stored record must carry.
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.as_str().trim().is_empty() {
            return Err("contact id cannot be empty".to_string());
        }
        if self.name.trim().is_empty() {
            return Err(format!("contact {} has an empty name", self.id));
        }
        Ok(())
    }
}

/// A cell group as supplied by the data store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    /// Unique identifier
    pub id: CellId,

    /// Cell name
    pub name: String,

    /// Name of the cell leader
    #[serde(default)]
    pub leader_name: String,
}

/// Changes to apply to an existing contact.
///
/// `None` leaves a field untouched. Nullable fields use `Option<Option<_>>`
/// so that `Some(None)` clears them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactUpdate {
    /// New name
    pub name: Option<String>,
    /// New contact number
    pub whatsapp: Option<String>,
    /// New neighborhood
    pub neighborhood: Option<String>,
    /// New city reference
    pub city_id: Option<Option<String>>,
    /// New birth date
    pub birth_date: Option<Option<NaiveDate>>,
    /// New encounter flag
    pub encounter_with_god: Option<bool>,
    /// New baptized flag
    pub baptized: Option<bool>,
    /// New founder flag
    pub founder: Option<bool>,
    /// New status
    pub status: Option<ContactStatus>,
    /// New cell reference
    pub cell_id: Option<Option<CellId>>,
    /// New referrer
    pub referred_by: Option<Option<ContactId>>,
    /// New photo reference
    pub photo_url: Option<Option<String>>,
}

impl ContactUpdate {
    /// True if applying this update would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Write every set field into `record`.
    pub fn apply(self, record: &mut ContactRecord) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(whatsapp) = self.whatsapp {
            record.whatsapp = whatsapp;
        }
        if let Some(neighborhood) = self.neighborhood {
            record.neighborhood = neighborhood;
        }
        if let Some(city_id) = self.city_id {
            record.city_id = city_id;
        }
        if let Some(birth_date) = self.birth_date {
            record.birth_date = birth_date;
        }
        if let Some(flag) = self.encounter_with_god {
            record.encounter_with_god = flag;
        }
        if let Some(flag) = self.baptized {
            record.baptized = flag;
        }
        if let Some(flag) = self.founder {
            record.founder = flag;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(cell_id) = self.cell_id {
            record.cell_id = cell_id;
        }
        if let Some(referred_by) = self.referred_by {
            record.referred_by = referred_by;
        }
        if let Some(photo_url) = self.photo_url {
            record.photo_url = photo_url;
        }
    }
}

/// Discipleship milestones carried onto each member node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberFlags {
    /// Attended an "encounter with God" retreat
    pub encounter_with_god: bool,
    /// Baptized
    pub baptized: bool,
    /// Founding member
    pub founder: bool,
}

/// A contact projected into the genealogy network.
///
/// `referrals`, `depth` and `descendants` are filled in by the graph
/// deriver; a freshly projected node has them empty/zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberNode {
    /// Source contact ID
    pub id: ContactId,
    /// Display name
    pub name: String,
    /// Leader of the member's cell, or [`NO_LEADER`]
    pub leader_name: String,
    /// Name of the member's cell, or [`NO_CELL`]
    pub cell_name: String,
    /// Membership status
    pub status: ContactStatus,
    /// Who introduced this member
    pub referrer: Option<ContactId>,
    /// Members introduced by this one, in source order
    pub referrals: Vec<ContactId>,
    /// Discipleship milestones
    pub flags: MemberFlags,
    /// Distance from the root of the referral tree
    pub depth: usize,
    /// Size of the transitive referral subtree below this member
    pub descendants: usize,
}

impl MemberNode {
    /// True if the member has introduced at least one other member.
    pub fn has_referrals(&self) -> bool {
        !self.referrals.is_empty()
    }
}
