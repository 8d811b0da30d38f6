//! Caller identity for resident endpoints.
//!
//! Sessions are handled upstream; by the time a request reaches this service
//! the session layer has put the authenticated user's id in `X-User-Id`.

use crate::error::ApiError;
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use common::model::resident::OwnerId;
use std::future::{ready, Ready};

pub const OWNER_HEADER: &str = "X-User-Id";

/// The owner every resident read or written by the request is scoped to.
#[derive(Debug, Clone)]
pub struct Caller(OwnerId);

impl Caller {
    pub fn into_inner(self) -> OwnerId {
        self.0
    }
}

impl FromRequest for Caller {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let owner = req
            .headers()
            .get(OWNER_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(OwnerId::parse);
        ready(owner.map(Caller).ok_or(ApiError::Unauthorized))
    }
}
