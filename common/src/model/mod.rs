//! Data shapes exchanged between the import pipeline, the resident store and
//! HTTP clients. Everything here serializes to camelCase JSON.

pub mod import;
pub mod resident;
