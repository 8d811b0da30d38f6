use crate::import::aliases::{lookup, room_fallback, ColumnAliasSet};
use common::model::import::{LogicalField, MissingField, RawRow, SkipRecord};
use common::model::resident::{NormalizedResident, OwnerId};

/// What became of a single uploaded row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowResult {
    Valid(NormalizedResident),
    Skipped(SkipRecord),
}

/// Turns one uploaded row into a resident, or records why it cannot be one.
///
/// `row_number` is the spreadsheet row (header = 1). A row is valid only when
/// both a name and an ID were found.
pub fn normalize_row(
    row: &RawRow,
    row_number: usize,
    owner: &OwnerId,
    aliases: &ColumnAliasSet,
) -> RowResult {
    let field = |f: LogicalField| lookup(row, aliases.aliases(f));

    let name = match (field(LogicalField::FirstName), field(LogicalField::LastName)) {
        (Some(first), Some(last)) => Some(format!("{first} {last}")),
        _ => field(LogicalField::FullName).map(str::to_string),
    };
    let external_id = field(LogicalField::Id);
    let email = field(LogicalField::Email).map(str::to_string);
    let room = field(LogicalField::Room)
        .or_else(|| room_fallback(row, aliases))
        .map(str::to_uppercase);

    let mut missing = Vec::new();
    if name.is_none() {
        missing.push(MissingField::Name);
    }
    if external_id.is_none() {
        missing.push(MissingField::Id);
    }

    let resident = name
        .zip(external_id)
        .and_then(|(name, id)| NormalizedResident::new(owner, name, id, email, room));
    match resident {
        Some(resident) => RowResult::Valid(resident),
        None => RowResult::Skipped(SkipRecord {
            row_number,
            reason: missing,
            original_row: row.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> OwnerId {
        OwnerId::parse("ra-1").unwrap()
    }

    fn row(cells: &[(&str, &str)]) -> RawRow {
        cells
            .iter()
            .map(|(h, v)| (*h, (!v.is_empty()).then(|| v.to_string())))
            .collect()
    }

    fn normalize(r: &RawRow) -> RowResult {
        normalize_row(r, 2, &owner(), &ColumnAliasSet::default())
    }

    fn valid(r: &RawRow) -> NormalizedResident {
        match normalize(r) {
            RowResult::Valid(resident) => resident,
            RowResult::Skipped(skip) => panic!("row skipped: {skip:?}"),
        }
    }

    fn skipped(r: &RawRow) -> SkipRecord {
        match normalize(r) {
            RowResult::Skipped(skip) => skip,
            RowResult::Valid(resident) => panic!("row accepted: {resident:?}"),
        }
    }

    #[test]
    fn first_and_last_name_win_over_name_column() {
        let r = row(&[
            ("First Name", "Jane"),
            ("Last Name", "Doe"),
            ("Name", "J. Doe"),
            ("ID", "1001"),
        ]);
        assert_eq!(valid(&r).name(), "Jane Doe");
    }

    #[test]
    fn full_name_used_when_first_or_last_is_blank() {
        let r = row(&[
            ("First Name", ""),
            ("Last Name", "Doe"),
            ("Name", " Jane Doe "),
            ("ID", "1001"),
        ]);
        assert_eq!(valid(&r).name(), "Jane Doe");
    }

    #[test]
    fn values_are_trimmed_and_room_upper_cased() {
        let r = row(&[
            ("Name", "Jane Doe"),
            ("Empl ID", " 1001234567 "),
            ("Email Address", " jane@example.edu "),
            ("Room Number", " tkra-0101-a1 "),
        ]);
        let resident = valid(&r);
        assert_eq!(resident.owner_id(), "ra-1");
        assert_eq!(resident.external_id(), "1001234567");
        assert_eq!(resident.email(), Some("jane@example.edu"));
        assert_eq!(resident.room(), Some("TKRA-0101-A1"));
    }

    #[test]
    fn room_falls_back_to_room_like_header() {
        let r = row(&[("Name", "Jane Doe"), ("ID", "1"), ("Dorm Assignment", "tkrb-0202")]);
        assert_eq!(valid(&r).room(), Some("TKRB-0202"));
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let resident = valid(&row(&[("Name", "Jane Doe"), ("ID", "1")]));
        assert_eq!(resident.email(), None);
        assert_eq!(resident.room(), None);
    }

    #[test]
    fn missing_name_is_reported() {
        let r = row(&[("First Name", ""), ("Last Name", "Smith"), ("ID", "1009876543")]);
        let skip = skipped(&r);
        assert_eq!(skip.row_number, 2);
        assert_eq!(skip.reason, vec![MissingField::Name]);
        assert_eq!(skip.original_row, r);
    }

    #[test]
    fn both_missing_fields_are_reported() {
        let skip = skipped(&row(&[("Email", "x@example.edu"), ("Room", "A1")]));
        assert_eq!(skip.reason, vec![MissingField::Name, MissingField::Id]);
    }

    #[test]
    fn blank_id_is_missing() {
        let skip = skipped(&row(&[("Name", "Jane Doe"), ("ID", "   ")]));
        assert_eq!(skip.reason, vec![MissingField::Id]);
    }
}
