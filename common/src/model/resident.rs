use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of the staff member who owns a set of residents.
///
/// Supplied by the session layer; never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resident produced by the import pipeline, ready to be upserted.
///
/// Construction goes through [`NormalizedResident::new`], which refuses blank
/// names or external IDs, so every value of this type is persistable. The
/// upsert key is `(owner_id, external_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResident {
    owner_id: String,
    name: String,
    external_id: String,
    email: Option<String>,
    room: Option<String>,
}

impl NormalizedResident {
    /// Returns `None` when `name` or `external_id` is blank.
    pub fn new(
        owner: &OwnerId,
        name: impl Into<String>,
        external_id: impl Into<String>,
        email: Option<String>,
        room: Option<String>,
    ) -> Option<Self> {
        let name = name.into();
        let external_id = external_id.into();
        if name.trim().is_empty() || external_id.trim().is_empty() {
            return None;
        }
        Some(Self {
            owner_id: owner.as_str().to_string(),
            name,
            external_id,
            email,
            room,
        })
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }
}

/// A resident row as it exists in the store after an upsert or a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredResident {
    /// Store-assigned identifier (UUID).
    pub id: String,
    pub owner_id: String,
    pub external_id: String,
    pub name: String,
    pub email: Option<String>,
    pub room: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
