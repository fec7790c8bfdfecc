use super::models::{
    ActiveModel, Column, Entity, Operator, OperatorCreate, OperatorFilter, OperatorUpdate,
};
use crate::auth::password::hash_password;
use crate::common::auth::protect;
use crate::common::errors::{ApiResult, DbErrorExt};
use crate::common::extract::ApiJson;
use crate::common::state::AppState;
use crate::stations::models as stations;
use crate::{duplicate_resource, not_found, validation_error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use utoipa_axum::{router::OpenApiRouter, routes};

const RESOURCE: &str = "Operator";

pub fn router(state: &AppState) -> OpenApiRouter {
    let router = OpenApiRouter::new()
        .routes(routes!(get_all_operators, create_operator))
        .routes(routes!(
            get_one_operator,
            update_operator,
            patch_operator,
            delete_operator
        ))
        .with_state(state.clone());

    protect(router, state, "operators")
}

async fn ensure_station<C: ConnectionTrait>(db: &C, station_id: &str) -> ApiResult<()> {
    if stations::Entity::find_by_id(station_id.to_string())
        .one(db)
        .await?
        .is_none()
    {
        return Err(validation_error!(
            "station_id",
            format!("unknown station '{station_id}'")
        ));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/",
    params(OperatorFilter),
    responses((status = 200, description = "Operators, optionally filtered", body = Vec<Operator>)),
    tag = "operators"
)]
pub async fn get_all_operators(
    State(state): State<AppState>,
    Query(filter): Query<OperatorFilter>,
) -> ApiResult<Json<Vec<Operator>>> {
    let mut query = Entity::find().order_by_asc(Column::Name);
    if let Some(active) = filter.active {
        query = query.filter(Column::Active.eq(active));
    }
    let operators = query.all(&state.db).await?;
    Ok(Json(operators.into_iter().map(Operator::from).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    request_body = OperatorCreate,
    responses(
        (status = 201, description = "Operator created", body = Operator),
        (status = 400, description = "Invalid payload or unknown station"),
        (status = 409, description = "Rfid already registered")
    ),
    tag = "operators"
)]
pub async fn create_operator(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<OperatorCreate>,
) -> ApiResult<(StatusCode, Json<Operator>)> {
    let rfid = payload.rfid.trim().to_string();
    if rfid.is_empty() {
        return Err(validation_error!("rfid", "must not be empty"));
    }
    if payload.password.is_empty() {
        return Err(validation_error!("password", "must not be empty"));
    }
    ensure_station(&state.db, &payload.station_id).await?;
    if Entity::find_by_id(rfid.clone()).one(&state.db).await?.is_some() {
        return Err(duplicate_resource!(RESOURCE, "rfid"));
    }

    let operator = ActiveModel {
        rfid: Set(rfid),
        name: Set(payload.name),
        password_hash: Set(hash_password(&payload.password)?),
        station_id: Set(payload.station_id),
        active: Set(payload.active),
    }
    .insert(&state.db)
    .await
    .for_resource(RESOURCE)?;

    tracing::info!(rfid = %operator.rfid, station = %operator.station_id, "operator registered");
    Ok((StatusCode::CREATED, Json(operator.into())))
}

#[utoipa::path(
    get,
    path = "/{rfid}",
    params(("rfid" = String, Path, description = "Operator rfid tag")),
    responses(
        (status = 200, description = "Operator", body = Operator),
        (status = 404, description = "Operator not found")
    ),
    tag = "operators"
)]
pub async fn get_one_operator(
    State(state): State<AppState>,
    Path(rfid): Path<String>,
) -> ApiResult<Json<Operator>> {
    let operator = Entity::find_by_id(rfid.clone())
        .one(&state.db)
        .await?
        .ok_or_else(|| not_found!(RESOURCE, rfid))?;
    Ok(Json(operator.into()))
}

async fn apply_update(state: &AppState, rfid: String, payload: OperatorUpdate) -> ApiResult<Operator> {
    let existing = Entity::find_by_id(rfid.clone())
        .one(&state.db)
        .await?
        .ok_or_else(|| not_found!(RESOURCE, rfid))?;
    let mut model: ActiveModel = existing.clone().into();

    if let Some(name) = payload.name {
        model.name = Set(name);
    }
    if let Some(password) = payload.password {
        if password.is_empty() {
            return Err(validation_error!("password", "must not be empty"));
        }
        model.password_hash = Set(hash_password(&password)?);
    }
    if let Some(station_id) = payload.station_id {
        ensure_station(&state.db, &station_id).await?;
        model.station_id = Set(station_id);
    }
    if let Some(active) = payload.active {
        model.active = Set(active);
    }

    if !model.is_changed() {
        return Ok(existing.into());
    }
    Ok(model.update(&state.db).await.for_resource(RESOURCE)?.into())
}

#[utoipa::path(
    put,
    path = "/{rfid}",
    params(("rfid" = String, Path, description = "Operator rfid tag")),
    request_body = OperatorUpdate,
    responses(
        (status = 200, description = "Operator updated", body = Operator),
        (status = 400, description = "Unknown station"),
        (status = 404, description = "Operator not found")
    ),
    tag = "operators"
)]
pub async fn update_operator(
    State(state): State<AppState>,
    Path(rfid): Path<String>,
    ApiJson(payload): ApiJson<OperatorUpdate>,
) -> ApiResult<Json<Operator>> {
    Ok(Json(apply_update(&state, rfid, payload).await?))
}

#[utoipa::path(
    patch,
    path = "/{rfid}",
    params(("rfid" = String, Path, description = "Operator rfid tag")),
    request_body = OperatorUpdate,
    responses(
        (status = 200, description = "Operator updated", body = Operator),
        (status = 400, description = "Unknown station"),
        (status = 404, description = "Operator not found")
    ),
    tag = "operators"
)]
pub async fn patch_operator(
    State(state): State<AppState>,
    Path(rfid): Path<String>,
    ApiJson(payload): ApiJson<OperatorUpdate>,
) -> ApiResult<Json<Operator>> {
    Ok(Json(apply_update(&state, rfid, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/{rfid}",
    params(("rfid" = String, Path, description = "Operator rfid tag")),
    responses(
        (status = 204, description = "Operator deleted"),
        (status = 404, description = "Operator not found")
    ),
    tag = "operators"
)]
pub async fn delete_operator(
    State(state): State<AppState>,
    Path(rfid): Path<String>,
) -> ApiResult<StatusCode> {
    let result = Entity::delete_by_id(rfid.clone()).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(not_found!(RESOURCE, rfid));
    }
    Ok(StatusCode::NO_CONTENT)
}
