//! Requester identity. Authentication happens upstream; the gateway forwards
//! the verified identity in request headers and this extractor reads them.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{Requester, UserRole};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const USER_ADMIN_HEADER: &str = "x-user-admin";

#[async_trait]
impl<S> FromRequestParts<S> for Requester
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
        };

        let user_id = header(USER_ID_HEADER)
            .and_then(|v| Uuid::parse_str(v).ok())
            .ok_or(AppError::Unauthorized)?;
        let role = header(USER_ROLE_HEADER)
            .and_then(|v| v.parse::<UserRole>().ok())
            .ok_or(AppError::Unauthorized)?;
        let is_admin = header(USER_ADMIN_HEADER)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Requester {
            user_id,
            role,
            is_admin,
        })
    }
}
