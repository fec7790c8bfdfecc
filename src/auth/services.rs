use super::models::{LoginRequest, TokenResponse};
use super::password::verify_account_password;
use super::tokens::{Identity, issue_pair};
use crate::common::auth::Role;
use crate::common::errors::{ApiError, ApiResult};
use crate::config::Config;
use crate::users::models::{Column, Entity, normalize_email};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Checks run in order and the first failure wins.
pub async fn login<C: ConnectionTrait>(
    db: &C,
    config: &Config,
    request: &LoginRequest,
) -> ApiResult<TokenResponse> {
    let (Some(email), Some(password)) = (
        non_empty(request.email.as_deref()),
        non_empty(request.password.as_deref()),
    ) else {
        return Err(ApiError::MissingCredentials);
    };
    let email = normalize_email(email);

    let user = Entity::find()
        .filter(Column::Email.eq(email.as_str()))
        .one(db)
        .await?;
    let stored_hash = user.as_ref().map(|u| u.password_hash.as_str());
    let matches = verify_account_password(password, stored_hash);

    let Some(user) = user else {
        tracing::warn!(email = %email, "login for unknown email");
        return Err(ApiError::InvalidCredentials);
    };
    if !matches {
        tracing::warn!(rfid = %user.rfid, "login with wrong password");
        return Err(ApiError::InvalidCredentials);
    }
    if !user.active {
        tracing::warn!(rfid = %user.rfid, "login to disabled account");
        return Err(ApiError::AccountDisabled);
    }
    if !Role::parse(&user.role, &config.admin_role).is_admin() {
        tracing::warn!(rfid = %user.rfid, role = %user.role, "login without administrative role");
        return Err(ApiError::PermissionDenied);
    }

    let identity = Identity {
        rfid: user.rfid,
        email: user.email,
        role: user.role,
        name: user.name,
    };
    let (access, refresh) = issue_pair(&identity, config)?;
    tracing::info!(rfid = %identity.rfid, "login succeeded");

    Ok(TokenResponse {
        access,
        refresh,
        role: identity.role,
    })
}
