//! # Resident Import Service
//!
//! Backend for `POST /api/residents/import`.
//!
//! 1. The multipart payload is read until the `file` field is found; other
//!    fields are drained and ignored. A missing or empty file is rejected, as
//!    is a file larger than the configured limit.
//! 2. Parsing, normalization and the store upsert are all blocking work, so
//!    they run together on Tokio's blocking pool.
//! 3. On success the response is `{"success": true, "imported": n, "outcome":
//!    ImportOutcome}`. Failures become JSON errors through `ApiError`.

use crate::error::{ApiError, ImportError};
use crate::identity::Caller;
use crate::import::parse_table;
use crate::state::AppState;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use log::{info, warn};
use serde_json::json;

pub async fn process(
    caller: Caller,
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let owner = caller.into_inner();
    let upload = read_file_field(payload, state.max_upload_bytes)
        .await?
        .ok_or(ImportError::InputMissing)?;

    let importer = state.importer.clone();
    let store = state.store.clone();
    let owner_for_import = owner.clone();
    let result = tokio::task::spawn_blocking(move || {
        let table = parse_table(&upload)?;
        importer.run(&table, &owner_for_import, store.as_ref())
    })
    .await
    .map_err(|e| ApiError::Internal(format!("join error: {e}")))?;

    match result {
        Ok(outcome) => {
            info!(
                "import for {owner}: {} rows, {} valid, {} skipped, {} persisted",
                outcome.total_rows, outcome.valid_rows, outcome.skipped_rows, outcome.persisted_count
            );
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "imported": outcome.persisted_count,
                "outcome": outcome,
            })))
        }
        Err(err) => {
            warn!("import for {owner} rejected: {err}");
            Err(err.into())
        }
    }
}

/// Collects the bytes of the `file` field, or `None` when the form has no
/// file or the file is empty.
async fn read_file_field(
    mut payload: Multipart,
    limit: usize,
) -> Result<Option<Vec<u8>>, ApiError> {
    let mut file: Option<Vec<u8>> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| ApiError::Upload(e.to_string()))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        if name.as_deref() != Some("file") || file.is_some() {
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| ApiError::Upload(e.to_string()))?;
            }
            continue;
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| ApiError::Upload(e.to_string()))?;
            if bytes.len() + chunk.len() > limit {
                return Err(ApiError::PayloadTooLarge { limit });
            }
            bytes.extend_from_slice(&chunk);
        }
        file = Some(bytes);
    }

    Ok(file.filter(|bytes| !bytes.is_empty()))
}
