//! Header alias table and the resolver that maps an uploader's column headers
//! onto the logical fields the importer understands.
//!
//! Matching is case-insensitive and exact: `"EMPL ID"` and `"empl id"` both
//! match the alias `"Empl ID"`, but `"Empl ID #"` does not. Aliases are tried
//! in their declared order, so the first alias wins regardless of where its
//! header sits in the file.
//!
//! Room is the one field with a second chance. When no room alias yields a
//! value, [`room_fallback`] scans the row for any header that merely looks like
//! a room column (see [`ColumnAliasSet::room_keywords`]).

use common::model::import::{ColumnMapping, LogicalField, RawRow};
use serde::{Deserialize, Serialize};

/// Accepted header spellings for each logical field, most specific first.
///
/// The built-in table is available through [`Default`]; deployments can load
/// a replacement from JSON (see `AppConfig::load_aliases`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnAliasSet {
    pub version: u32,
    pub first_name: Vec<String>,
    pub last_name: Vec<String>,
    pub full_name: Vec<String>,
    pub id: Vec<String>,
    pub email: Vec<String>,
    pub room: Vec<String>,
    /// Substrings that mark a header as a room column when no room alias
    /// produced a value.
    #[serde(default = "default_room_keywords")]
    pub room_keywords: Vec<String>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn default_room_keywords() -> Vec<String> {
    strings(&["room", "space", "residence", "dorm"])
}

impl Default for ColumnAliasSet {
    fn default() -> Self {
        Self {
            version: 1,
            first_name: strings(&["First Name", "firstname"]),
            last_name: strings(&["Last Name", "lastname"]),
            full_name: strings(&["Name"]),
            id: strings(&["ID", "Empl ID", "ASU ID", "Student ID", "emplId", "empl_id"]),
            email: strings(&["Email", "Email Address"]),
            room: strings(&[
                "RoomSpaceDescription",
                "Room Space Description",
                "RoomSpace",
                "Room Space",
                "Room Number",
                "Room",
            ]),
            room_keywords: default_room_keywords(),
        }
    }
}

impl ColumnAliasSet {
    pub fn aliases(&self, field: LogicalField) -> &[String] {
        match field {
            LogicalField::FirstName => &self.first_name,
            LogicalField::LastName => &self.last_name,
            LogicalField::FullName => &self.full_name,
            LogicalField::Id => &self.id,
            LogicalField::Email => &self.email,
            LogicalField::Room => &self.room,
        }
    }

    fn is_room_like(&self, header: &str) -> bool {
        let header = header.to_lowercase();
        self.room_keywords
            .iter()
            .any(|keyword| header.contains(&keyword.to_lowercase()))
    }
}

/// Detects which header feeds each logical field, for reporting.
///
/// Room falls back to the first room-like header in file order.
pub fn resolve_columns(headers: &[String], aliases: &ColumnAliasSet) -> ColumnMapping {
    let mut mapping = ColumnMapping::default();
    for field in LogicalField::ALL {
        mapping.set(field, detect_header(headers, aliases.aliases(field)));
    }
    if mapping.room.is_none() {
        mapping.room = headers.iter().find(|h| aliases.is_room_like(h)).cloned();
    }
    mapping
}

fn detect_header(headers: &[String], aliases: &[String]) -> Option<String> {
    aliases.iter().find_map(|alias| {
        let alias = alias.to_lowercase();
        headers.iter().find(|h| h.to_lowercase() == alias).cloned()
    })
}

/// First non-blank, trimmed value in `row` under any of `aliases`.
///
/// A matching header with a blank value does not stop the search; the next
/// alias is tried.
pub fn lookup<'r>(row: &'r RawRow, aliases: &[String]) -> Option<&'r str> {
    aliases
        .iter()
        .filter_map(|alias| row.get_ignore_case(alias))
        .map(str::trim)
        .find(|value| !value.is_empty())
}

/// Per-row room scan used when no room alias produced a value.
///
/// Each row is scanned on its own, so two rows may take their room from
/// different columns.
pub fn room_fallback<'r>(row: &'r RawRow, aliases: &ColumnAliasSet) -> Option<&'r str> {
    row.cells()
        .filter(|(header, _)| aliases.is_room_like(header))
        .filter_map(|(_, value)| value)
        .map(str::trim)
        .find(|value| !value.is_empty())
}
