use crate::error::ImportError;
use crate::import::aliases::{resolve_columns, ColumnAliasSet};
use crate::import::normalize::{normalize_row, RowResult};
use crate::import::parse::ParsedTable;
use crate::store::ResidentStore;
use common::model::import::{ImportOutcome, LogicalField};
use common::model::resident::OwnerId;
use log::{debug, error};

/// How many skipped rows are echoed back verbatim by default.
pub const DEFAULT_MAX_SKIP_DETAILS: usize = 10;

/// Runs uploaded tables through normalization and into a [`ResidentStore`].
///
/// Holds the alias table and reporting limits for the lifetime of the server;
/// every call to [`Importer::run`] is independent.
#[derive(Debug, Clone)]
pub struct Importer {
    aliases: ColumnAliasSet,
    max_skip_details: usize,
}

impl Default for Importer {
    fn default() -> Self {
        Self::new(ColumnAliasSet::default(), DEFAULT_MAX_SKIP_DETAILS)
    }
}

impl Importer {
    pub fn new(aliases: ColumnAliasSet, max_skip_details: usize) -> Self {
        Self {
            aliases,
            max_skip_details,
        }
    }

    /// Normalizes every row in file order, then upserts the valid ones in a
    /// single store call.
    ///
    /// Invalid rows are reported, not raised. The call fails when no row is
    /// valid or when the store rejects the batch; both failures carry the
    /// outcome computed up to that point.
    pub fn run(
        &self,
        table: &ParsedTable,
        owner: &OwnerId,
        store: &dyn ResidentStore,
    ) -> Result<ImportOutcome, ImportError> {
        debug!("import for {owner}: normalizing {} rows", table.rows.len());
        let mut outcome = ImportOutcome {
            total_rows: table.rows.len(),
            detected_columns: table.headers.clone(),
            column_mapping: resolve_columns(&table.headers, &self.aliases),
            ..ImportOutcome::default()
        };

        let mut valid = Vec::new();
        for row in &table.rows {
            match normalize_row(&row.cells, row.number, owner, &self.aliases) {
                RowResult::Valid(resident) => valid.push(resident),
                RowResult::Skipped(skip) => {
                    outcome.skipped_rows += 1;
                    if outcome.skipped_details.len() < self.max_skip_details {
                        outcome.skipped_details.push(skip);
                    }
                }
            }
        }
        outcome.valid_rows = valid.len();

        if valid.is_empty() {
            let suggestion = self.suggestion(&outcome);
            return Err(ImportError::NoValidRows {
                feedback: Box::new(outcome),
                suggestion,
            });
        }

        debug!("import for {owner}: persisting {} residents", valid.len());
        match store.upsert_residents(&valid) {
            Ok(records) => {
                outcome.persisted_count = records.len();
                outcome.persisted_records = records;
                Ok(outcome)
            }
            Err(source) => {
                error!("import for {owner}: store rejected {} residents: {source}", valid.len());
                Err(ImportError::PersistenceFailure {
                    source,
                    feedback: Box::new(outcome),
                })
            }
        }
    }

    fn suggestion(&self, outcome: &ImportOutcome) -> String {
        let list = |field: LogicalField| self.aliases.aliases(field).join(", ");
        let detected = if outcome.detected_columns.is_empty() {
            "none".to_string()
        } else {
            outcome.detected_columns.join(", ")
        };
        format!(
            "Detected columns: {detected}. Each row needs a name (one of: {}; or first name: {} with last name: {}) and an ID (one of: {}).",
            list(LogicalField::FullName),
            list(LogicalField::FirstName),
            list(LogicalField::LastName),
            list(LogicalField::Id),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::parse::parse_table;
    use crate::store::memory::MemoryResidentStore;
    use common::model::import::MissingField;

    fn owner() -> OwnerId {
        OwnerId::parse("ra-1").unwrap()
    }

    fn run(csv: &str, store: &MemoryResidentStore) -> Result<ImportOutcome, ImportError> {
        let table = parse_table(csv.as_bytes()).unwrap();
        Importer::default().run(&table, &owner(), store)
    }

    #[test]
    fn example_file_imports_one_and_skips_one() {
        let store = MemoryResidentStore::default();
        let csv = "First Name,Last Name,ID,Room\n\
                   Jane,Doe,1001234567,tkra-0101-a1\n\
                   ,Smith,1009876543,TKRB-0202\n";
        let outcome = run(csv, &store).unwrap();

        assert_eq!(outcome.total_rows, 2);
        assert_eq!(outcome.valid_rows, 1);
        assert_eq!(outcome.skipped_rows, 1);
        assert_eq!(outcome.persisted_count, 1);
        let jane = &outcome.persisted_records[0];
        assert_eq!(jane.name, "Jane Doe");
        assert_eq!(jane.external_id, "1001234567");
        assert_eq!(jane.room.as_deref(), Some("TKRA-0101-A1"));

        let skip = &outcome.skipped_details[0];
        assert_eq!(skip.row_number, 3);
        assert_eq!(skip.reason, vec![MissingField::Name]);

        assert_eq!(outcome.detected_columns, vec!["First Name", "Last Name", "ID", "Room"]);
        assert_eq!(outcome.column_mapping.full_name, None);
        assert_eq!(outcome.column_mapping.room.as_deref(), Some("Room"));
    }

    #[test]
    fn skip_row_numbers_match_the_spreadsheet() {
        let store = MemoryResidentStore::default();
        let csv = "Name,ID\nA,1\nB,2\nC,\nD,4\n,5\n";
        let outcome = run(csv, &store).unwrap();
        let rows: Vec<usize> = outcome.skipped_details.iter().map(|s| s.row_number).collect();
        assert_eq!(rows, vec![4, 6]);
    }

    #[test]
    fn blank_lines_keep_their_spreadsheet_rows() {
        let store = MemoryResidentStore::default();
        let outcome = run("Name,ID\nA,1\n\nB,\n\n\n,7\n", &store).unwrap();
        let rows: Vec<usize> = outcome.skipped_details.iter().map(|s| s.row_number).collect();
        assert_eq!(rows, vec![4, 7]);
        assert_eq!(outcome.total_rows, 3);
    }

    #[test]
    fn reimporting_the_same_file_is_idempotent() {
        let store = MemoryResidentStore::default();
        let csv = "Name,Student ID,Email\nJane Doe,1,j@x.edu\nJohn Roe,2,\nJane Doe,1,j@x.edu\n";
        let first = run(csv, &store).unwrap();
        let second = run(csv, &store).unwrap();
        assert_eq!(first.persisted_count, 2);
        assert_eq!(second.persisted_count, first.persisted_count);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn all_invalid_rows_reject_the_import() {
        let store = MemoryResidentStore::default();
        let csv = "Notes,Floor\nhello,1\nworld,2\nagain,3\n";
        match run(csv, &store) {
            Err(ImportError::NoValidRows {
                feedback,
                suggestion,
            }) => {
                assert_eq!(feedback.valid_rows, 0);
                assert_eq!(feedback.skipped_rows, 3);
                assert_eq!(feedback.total_rows, 3);
                assert_eq!(
                    feedback.skipped_details[0].reason,
                    vec![MissingField::Name, MissingField::Id]
                );
                assert!(suggestion.contains("Notes, Floor"));
                assert!(suggestion.contains("Empl ID"));
            }
            other => panic!("expected NoValidRows, got {other:?}"),
        }
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn header_only_file_has_no_valid_rows() {
        let store = MemoryResidentStore::default();
        assert!(matches!(
            run("Name,ID\n", &store),
            Err(ImportError::NoValidRows { .. })
        ));
    }

    #[test]
    fn skip_details_are_truncated_but_counted() {
        let store = MemoryResidentStore::default();
        let mut csv = String::from("Name,ID\nKeeper,1\n");
        for i in 0..15 {
            csv.push_str(&format!("Nobody {i},\n"));
        }
        let outcome = run(&csv, &store).unwrap();
        assert_eq!(outcome.skipped_rows, 15);
        assert_eq!(outcome.skipped_details.len(), 10);
        assert_eq!(outcome.skipped_details[0].row_number, 3);
    }

    #[test]
    fn skip_detail_limit_is_configurable() {
        let store = MemoryResidentStore::default();
        let table = parse_table(b"Name,ID\nA,1\nB,\nC,\n").unwrap();
        let outcome = Importer::new(ColumnAliasSet::default(), 1)
            .run(&table, &owner(), &store)
            .unwrap();
        assert_eq!(outcome.skipped_rows, 2);
        assert_eq!(outcome.skipped_details.len(), 1);
    }

    #[test]
    fn store_failure_carries_feedback() {
        let store = MemoryResidentStore::failing("connection refused");
        let csv = "Name,ID\nJane Doe,1\nNo Id,\n";
        match run(csv, &store) {
            Err(ImportError::PersistenceFailure { source, feedback }) => {
                assert!(source.to_string().contains("connection refused"));
                assert_eq!(feedback.valid_rows, 1);
                assert_eq!(feedback.skipped_rows, 1);
                assert_eq!(feedback.persisted_count, 0);
            }
            other => panic!("expected PersistenceFailure, got {other:?}"),
        }
    }

    #[test]
    fn substituted_alias_set_is_used() {
        let store = MemoryResidentStore::default();
        let aliases = ColumnAliasSet {
            full_name: vec!["Resident".into()],
            id: vec!["Badge".into()],
            ..ColumnAliasSet::default()
        };
        let table = parse_table(b"Resident,Badge,Name,ID\nJane Doe,B-1,,\n").unwrap();
        let outcome = Importer::new(aliases, DEFAULT_MAX_SKIP_DETAILS)
            .run(&table, &owner(), &store)
            .unwrap();
        assert_eq!(outcome.persisted_records[0].external_id, "B-1");
        assert_eq!(outcome.column_mapping.id.as_deref(), Some("Badge"));
    }
}
