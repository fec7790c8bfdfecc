use super::models::{ActiveModel, Column, Entity, User, UserCreate, UserUpdate, normalize_email};
use crate::auth::password::hash_password;
use crate::common::auth::protect;
use crate::common::errors::{ApiResult, DbErrorExt};
use crate::common::extract::ApiJson;
use crate::common::state::AppState;
use crate::production::models as production;
use crate::{duplicate_resource, not_found, validation_error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use utoipa_axum::{router::OpenApiRouter, routes};

const RESOURCE: &str = "User";

pub fn router(state: &AppState) -> OpenApiRouter {
    let router = OpenApiRouter::new()
        .routes(routes!(get_all_users, create_user))
        .routes(routes!(get_one_user, update_user, patch_user, delete_user))
        .with_state(state.clone());

    protect(router, state, "users")
}

async fn email_taken<C: ConnectionTrait>(db: &C, email: &str, except_rfid: Option<&str>) -> ApiResult<bool> {
    let mut query = Entity::find().filter(Column::Email.eq(email));
    if let Some(rfid) = except_rfid {
        query = query.filter(Column::Rfid.ne(rfid));
    }
    Ok(query.one(db).await?.is_some())
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "All users", body = Vec<User>)),
    tag = "users"
)]
pub async fn get_all_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let users = Entity::find()
        .order_by_asc(Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(users.into_iter().map(User::from).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    request_body = UserCreate,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Rfid or email already registered")
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<UserCreate>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let rfid = payload.rfid.trim().to_string();
    let email = normalize_email(&payload.email);
    if rfid.is_empty() {
        return Err(validation_error!("rfid", "must not be empty"));
    }
    if email.is_empty() {
        return Err(validation_error!("email", "must not be empty"));
    }
    if payload.password.is_empty() {
        return Err(validation_error!("password", "must not be empty"));
    }

    if Entity::find_by_id(rfid.clone()).one(&state.db).await?.is_some() {
        return Err(duplicate_resource!(RESOURCE, "rfid"));
    }
    if email_taken(&state.db, &email, None).await? {
        return Err(duplicate_resource!(RESOURCE, "email"));
    }

    let user = ActiveModel {
        rfid: Set(rfid),
        name: Set(payload.name),
        email: Set(email),
        password_hash: Set(hash_password(&payload.password)?),
        role: Set(payload.role.trim().to_string()),
        active: Set(payload.active),
    }
    .insert(&state.db)
    .await
    .for_resource(RESOURCE)?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(
    get,
    path = "/{rfid}",
    params(("rfid" = String, Path, description = "User rfid tag")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn get_one_user(
    State(state): State<AppState>,
    Path(rfid): Path<String>,
) -> ApiResult<Json<User>> {
    let user = Entity::find_by_id(rfid.clone())
        .one(&state.db)
        .await?
        .ok_or_else(|| not_found!(RESOURCE, rfid))?;
    Ok(Json(user.into()))
}

async fn apply_update(state: &AppState, rfid: String, payload: UserUpdate) -> ApiResult<User> {
    let existing = Entity::find_by_id(rfid.clone())
        .one(&state.db)
        .await?
        .ok_or_else(|| not_found!(RESOURCE, rfid))?;
    let mut model: ActiveModel = existing.clone().into();

    if let Some(name) = payload.name {
        model.name = Set(name);
    }
    if let Some(email) = payload.email {
        let email = normalize_email(&email);
        if email.is_empty() {
            return Err(validation_error!("email", "must not be empty"));
        }
        if email_taken(&state.db, &email, Some(&rfid)).await? {
            return Err(duplicate_resource!(RESOURCE, "email"));
        }
        model.email = Set(email);
    }
    if let Some(password) = payload.password {
        if password.is_empty() {
            return Err(validation_error!("password", "must not be empty"));
        }
        model.password_hash = Set(hash_password(&password)?);
    }
    if let Some(role) = payload.role {
        model.role = Set(role.trim().to_string());
    }
    if let Some(active) = payload.active {
        model.active = Set(active);
    }

    if !model.is_changed() {
        return Ok(existing.into());
    }
    let user = model.update(&state.db).await.for_resource(RESOURCE)?;
    Ok(user.into())
}

#[utoipa::path(
    put,
    path = "/{rfid}",
    params(("rfid" = String, Path, description = "User rfid tag")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered")
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(rfid): Path<String>,
    ApiJson(payload): ApiJson<UserUpdate>,
) -> ApiResult<Json<User>> {
    Ok(Json(apply_update(&state, rfid, payload).await?))
}

#[utoipa::path(
    patch,
    path = "/{rfid}",
    params(("rfid" = String, Path, description = "User rfid tag")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered")
    ),
    tag = "users"
)]
pub async fn patch_user(
    State(state): State<AppState>,
    Path(rfid): Path<String>,
    ApiJson(payload): ApiJson<UserUpdate>,
) -> ApiResult<Json<User>> {
    Ok(Json(apply_update(&state, rfid, payload).await?))
}

/// Production orders of a deleted user are kept with no user reference
#[utoipa::path(
    delete,
    path = "/{rfid}",
    params(("rfid" = String, Path, description = "User rfid tag")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(rfid): Path<String>,
) -> ApiResult<StatusCode> {
    let txn = state.db.begin().await?;
    production::Entity::update_many()
        .col_expr(production::Column::UserId, Expr::value(Option::<String>::None))
        .filter(production::Column::UserId.eq(rfid.as_str()))
        .exec(&txn)
        .await?;
    let result = Entity::delete_by_id(rfid.clone()).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(not_found!(RESOURCE, rfid));
    }
    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
