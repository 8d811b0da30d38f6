//! Shared application state handed to every handler.
//!
//! `AppState` is built once in `main.rs` and cloned into each Actix worker as
//! `web::Data`. Everything inside is either immutable after startup or
//! synchronizes on its own, so handlers never take a lock here.

use crate::import::Importer;
use crate::rooms::RoomOrder;
use crate::store::ResidentStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Where imported residents are upserted and listed from.
    pub store: Arc<dyn ResidentStore>,
    /// Alias table and reporting limits for CSV imports.
    pub importer: Arc<Importer>,
    pub rooms: Arc<RoomOrder>,
    /// Uploads larger than this are refused before parsing.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ResidentStore>,
        importer: Importer,
        rooms: RoomOrder,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            store,
            importer: Arc::new(importer),
            rooms: Arc::new(rooms),
            max_upload_bytes,
        }
    }
}
