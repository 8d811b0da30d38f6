use crate::model::resident::StoredResident;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One data row of an uploaded table, keyed by the uploader's own headers.
///
/// Cells keep the header order of the file. Duplicate headers are allowed;
/// lookups return the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: Vec<(String, Option<String>)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, header: impl Into<String>, value: Option<String>) {
        self.cells.push((header.into(), value));
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Headers and values in file order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.cells
            .iter()
            .map(|(header, value)| (header.as_str(), value.as_deref()))
    }

    /// Value under the first header equal to `header`, ignoring case.
    pub fn get_ignore_case(&self, header: &str) -> Option<&str> {
        let wanted = header.to_lowercase();
        self.cells
            .iter()
            .find(|(h, _)| h.to_lowercase() == wanted)
            .and_then(|(_, value)| value.as_deref())
    }
}

impl<H: Into<String>> FromIterator<(H, Option<String>)> for RawRow {
    fn from_iter<T: IntoIterator<Item = (H, Option<String>)>>(iter: T) -> Self {
        Self {
            cells: iter.into_iter().map(|(h, v)| (h.into(), v)).collect(),
        }
    }
}

impl Serialize for RawRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (header, value) in &self.cells {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

struct RawRowVisitor;

impl<'de> Visitor<'de> for RawRowVisitor {
    type Value = RawRow;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of column header to optional string value")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RawRow, A::Error> {
        let mut row = RawRow::new();
        while let Some((header, value)) = access.next_entry::<String, Option<String>>()? {
            row.push(header, value);
        }
        Ok(row)
    }
}

impl<'de> Deserialize<'de> for RawRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RawRowVisitor)
    }
}

/// The logical columns the importer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogicalField {
    FirstName,
    LastName,
    FullName,
    Id,
    Email,
    Room,
}

impl LogicalField {
    pub const ALL: [LogicalField; 6] = [
        LogicalField::FirstName,
        LogicalField::LastName,
        LogicalField::FullName,
        LogicalField::Id,
        LogicalField::Email,
        LogicalField::Room,
    ];
}

/// Which uploaded header was detected for each logical field.
///
/// Informational only: row extraction resolves each row on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub id: Option<String>,
    pub email: Option<String>,
    pub room: Option<String>,
}

impl ColumnMapping {
    pub fn get(&self, field: LogicalField) -> Option<&str> {
        match field {
            LogicalField::FirstName => self.first_name.as_deref(),
            LogicalField::LastName => self.last_name.as_deref(),
            LogicalField::FullName => self.full_name.as_deref(),
            LogicalField::Id => self.id.as_deref(),
            LogicalField::Email => self.email.as_deref(),
            LogicalField::Room => self.room.as_deref(),
        }
    }

    pub fn set(&mut self, field: LogicalField, header: Option<String>) {
        let slot = match field {
            LogicalField::FirstName => &mut self.first_name,
            LogicalField::LastName => &mut self.last_name,
            LogicalField::FullName => &mut self.full_name,
            LogicalField::Id => &mut self.id,
            LogicalField::Email => &mut self.email,
            LogicalField::Room => &mut self.room,
        };
        *slot = header;
    }
}

/// A required resident attribute that a row failed to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingField {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "ID")]
    Id,
}

/// Why a single row was left out of an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipRecord {
    /// Spreadsheet row number: the header is row 1, the first data row is row 2.
    pub row_number: usize,
    pub reason: Vec<MissingField>,
    pub original_row: RawRow,
}

/// A structural problem found while reading the uploaded CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseIssue {
    /// Line in the file, when the parser could locate the problem.
    pub line: Option<u64>,
    pub message: String,
}

/// Result of one import call, returned to the uploader.
///
/// `skipped_details` may be truncated; compare its length with
/// `skipped_rows` to detect that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub skipped_rows: usize,
    pub detected_columns: Vec<String>,
    pub column_mapping: ColumnMapping,
    pub skipped_details: Vec<SkipRecord>,
    pub persisted_count: usize,
    pub persisted_records: Vec<StoredResident>,
}
