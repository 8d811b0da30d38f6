//! HTTP endpoints for residents.
//!
//! - `POST /api/residents/import`: multipart/form-data upload with a `file`
//!   field holding CSV text. The rows are normalized and upserted for the
//!   caller; the response reports detected columns, skipped rows and the
//!   persisted residents.
//! - `GET /api/residents`: the caller's residents, ordered by room.
//!
//! Both routes require the `X-User-Id` header (see `identity`).

use actix_web::web::{get, post, scope};
use actix_web::Scope;

mod import;
mod list;


const API_PATH: &str = "/api/residents";

/// Configures and returns the Actix scope for resident routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/import", post().to(import::process))
}
