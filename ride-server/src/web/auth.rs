//! Request identity.
//!
//! Callers identify themselves with an `x-user-id` header carrying their
//! user id. The extractor resolves it against the user store, so handlers
//! always see a real account; a missing, malformed or unknown id is a 401
//! before the handler runs.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::{User, UserId};

use super::routes::ApiError;
use super::state::AppState;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// The caller's id.
    pub fn id(&self) -> UserId {
        self.0.id
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized {
                message: "Not authorized, no user id".to_owned(),
            })?;

        let id = UserId::parse(raw).map_err(|_| ApiError::Unauthorized {
            message: format!("Invalid user id: {raw}"),
        })?;

        let user = state.users.get(id).await.ok_or_else(|| ApiError::Unauthorized {
            message: "Not authorized, user not found".to_owned(),
        })?;

        Ok(CurrentUser(user))
    }
}
