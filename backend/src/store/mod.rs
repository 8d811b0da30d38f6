//! Persistence of imported residents.
//!
//! The importer only talks to [`ResidentStore`]. Upserts are keyed on
//! `(owner, external ID)` and conflicts are resolved by the store itself; the
//! importer never reads existing rows to diff against them.

mod sqlite;

pub use sqlite::SqliteResidentStore;

use common::model::resident::{NormalizedResident, OwnerId, StoredResident};
use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(rusqlite::Error),

    #[error("store rejected the batch: {0}")]
    Rejected(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => StoreError::Rejected(err.to_string()),
            _ => StoreError::Database(err),
        }
    }
}

pub trait ResidentStore: Send + Sync {
    /// Inserts or updates every resident in one atomic batch.
    ///
    /// Returns one stored record per distinct key; when the batch repeats a
    /// key, the later resident wins.
    fn upsert_residents(
        &self,
        residents: &[NormalizedResident],
    ) -> Result<Vec<StoredResident>, StoreError>;

    fn list_residents(&self, owner: &OwnerId) -> Result<Vec<StoredResident>, StoreError>;
}
