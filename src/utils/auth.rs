use actix_identity::{Identity, IdentityExt};
use actix_web::dev::Payload;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, Ready};

use crate::errors::{AppError, Result};

/// The caller as resolved from the session identity; `None` when anonymous.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentUser(pub Option<i64>);

impl CurrentUser {
    pub fn id(&self) -> Option<i64> {
        self.0
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }

    pub fn owns(&self, user_id: i64) -> bool {
        self.0 == Some(user_id)
    }
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user_id = req
            .get_identity()
            .ok()
            .and_then(|identity| identity.id().ok())
            .and_then(|id| id.parse::<i64>().ok());
        ready(Ok(CurrentUser(user_id)))
    }
}

/// Attaches the user id to the session as the login identity.
pub fn log_in(req: &HttpRequest, user_id: i64) -> Result<()> {
    Identity::login(&req.extensions(), user_id.to_string())
        .map(|_| ())
        .map_err(|e| AppError::Session(e.to_string()))
}
