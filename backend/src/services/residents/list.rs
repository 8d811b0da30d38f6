use crate::error::ApiError;
use crate::identity::Caller;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// Lists the caller's residents, ordered by room.
pub async fn process(
    caller: Caller,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let owner = caller.into_inner();
    let store = state.store.clone();
    let mut residents = tokio::task::spawn_blocking(move || store.list_residents(&owner))
        .await
        .map_err(|e| ApiError::Internal(format!("join error: {e}")))??;
    state.rooms.sort(&mut residents);
    Ok(HttpResponse::Ok().json(residents))
}
