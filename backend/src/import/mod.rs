//! Resident CSV import.
//!
//! An upload moves through four stages, each in its own module:
//! - `parse`: CSV text to a header list and raw rows. Structural problems
//!   reject the whole file.
//! - `aliases`: which uploaded header feeds which logical field.
//! - `normalize`: one raw row to a resident or a skip record.
//! - `batch`: drives the rows in file order, rejects uploads without a single
//!   usable row, and hands the rest to the store in one upsert.

pub mod aliases;
pub mod batch;
pub mod normalize;
pub mod parse;

pub use aliases::ColumnAliasSet;
pub use batch::Importer;
pub use parse::parse_table;
