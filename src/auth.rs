//! Acting principal and authorization checks.
//!
//! Token verification happens upstream; the gateway forwards the
//! authenticated identity as trusted headers which are read here.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::models::TextEntry;

pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLES_HEADER: &str = "x-user-roles";

pub const ADMIN_ROLE: &str = "ADMIN";

// == Principal ==
/// The user on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub user_id: Option<i64>,
    pub roles: Vec<String>,
}

impl Principal {
    pub fn user(username: impl Into<String>, user_id: Option<i64>) -> Self {
        Self {
            username: username.into(),
            user_id,
            roles: vec!["USER".to_string()],
        }
    }

    pub fn admin(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            user_id: None,
            roles: vec![ADMIN_ROLE.to_string()],
        }
    }

    /// Accepts both `ADMIN` and the prefixed `ROLE_ADMIN` form.
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|role| {
            let role = role.trim();
            role.eq_ignore_ascii_case(ADMIN_ROLE) || role.eq_ignore_ascii_case("ROLE_ADMIN")
        })
    }

    pub fn owns(&self, entry: &TextEntry) -> bool {
        entry.owner == self.username
    }

    /// Fails with AccessDenied unless the principal owns the entry or is an admin.
    pub fn ensure_can_modify(&self, entry: &TextEntry) -> Result<(), AppError> {
        if self.owns(entry) || self.is_admin() {
            Ok(())
        } else {
            Err(AppError::AccessDenied(format!(
                "User '{}' may not modify entry {}",
                self.username, entry.id
            )))
        }
    }

    pub fn ensure_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::AccessDenied(format!(
                "User '{}' is not an administrator",
                self.username
            )))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
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
                .filter(|v| !v.is_empty())
        };

        let username = header(USER_NAME_HEADER)
            .ok_or_else(|| AppError::Unauthenticated("Missing user identity".to_string()))?
            .to_string();

        let user_id = match header(USER_ID_HEADER) {
            Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
                AppError::Validation(format!("Invalid {} header", USER_ID_HEADER))
            })?),
            None => None,
        };

        let roles = header(USER_ROLES_HEADER)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Principal {
            username,
            user_id,
            roles,
        })
    }
}
