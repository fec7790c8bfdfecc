use super::models::{ActiveModel, Column, Entity, Station, StationCreate, StationUpdate};
use crate::common::auth::protect;
use crate::common::errors::{ApiResult, DbErrorExt};
use crate::common::extract::ApiJson;
use crate::common::state::AppState;
use crate::operators::models as operators;
use crate::{duplicate_resource, not_found, validation_error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait};
use utoipa_axum::{router::OpenApiRouter, routes};

const RESOURCE: &str = "Station";

pub fn router(state: &AppState) -> OpenApiRouter {
    let router = OpenApiRouter::new()
        .routes(routes!(get_all_stations, create_station))
        .routes(routes!(
            get_one_station,
            update_station,
            patch_station,
            delete_station
        ))
        .with_state(state.clone());

    protect(router, state, "stations")
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "All stations", body = Vec<Station>)),
    tag = "stations"
)]
pub async fn get_all_stations(State(state): State<AppState>) -> ApiResult<Json<Vec<Station>>> {
    let stations = Entity::find()
        .order_by_asc(Column::StationId)
        .all(&state.db)
        .await?;
    Ok(Json(stations.into_iter().map(Station::from).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    request_body = StationCreate,
    responses(
        (status = 201, description = "Station created", body = Station),
        (status = 409, description = "Station id already exists")
    ),
    tag = "stations"
)]
pub async fn create_station(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<StationCreate>,
) -> ApiResult<(StatusCode, Json<Station>)> {
    let station_id = payload.station_id.trim().to_string();
    if station_id.is_empty() {
        return Err(validation_error!("station_id", "must not be empty"));
    }
    if Entity::find_by_id(station_id).one(&state.db).await?.is_some() {
        return Err(duplicate_resource!(RESOURCE, "station_id"));
    }

    let station = ActiveModel::from(payload)
        .insert(&state.db)
        .await
        .for_resource(RESOURCE)?;
    Ok((StatusCode::CREATED, Json(station.into())))
}

#[utoipa::path(
    get,
    path = "/{station_id}",
    params(("station_id" = String, Path, description = "Station id")),
    responses(
        (status = 200, description = "Station", body = Station),
        (status = 404, description = "Station not found")
    ),
    tag = "stations"
)]
pub async fn get_one_station(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
) -> ApiResult<Json<Station>> {
    let station = Entity::find_by_id(station_id.clone())
        .one(&state.db)
        .await?
        .ok_or_else(|| not_found!(RESOURCE, station_id))?;
    Ok(Json(station.into()))
}

async fn apply_update(state: &AppState, station_id: String, payload: StationUpdate) -> ApiResult<Station> {
    let existing = Entity::find_by_id(station_id.clone())
        .one(&state.db)
        .await?
        .ok_or_else(|| not_found!(RESOURCE, station_id))?;
    let model = payload.merge_into_activemodel(existing.clone().into());
    if !model.is_changed() {
        return Ok(existing.into());
    }
    let station = model.update(&state.db).await.for_resource(RESOURCE)?;
    Ok(station.into())
}

#[utoipa::path(
    put,
    path = "/{station_id}",
    params(("station_id" = String, Path, description = "Station id")),
    request_body = StationUpdate,
    responses(
        (status = 200, description = "Station updated", body = Station),
        (status = 404, description = "Station not found")
    ),
    tag = "stations"
)]
pub async fn update_station(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
    ApiJson(payload): ApiJson<StationUpdate>,
) -> ApiResult<Json<Station>> {
    Ok(Json(apply_update(&state, station_id, payload).await?))
}

#[utoipa::path(
    patch,
    path = "/{station_id}",
    params(("station_id" = String, Path, description = "Station id")),
    request_body = StationUpdate,
    responses(
        (status = 200, description = "Station updated", body = Station),
        (status = 404, description = "Station not found")
    ),
    tag = "stations"
)]
pub async fn patch_station(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
    ApiJson(payload): ApiJson<StationUpdate>,
) -> ApiResult<Json<Station>> {
    Ok(Json(apply_update(&state, station_id, payload).await?))
}

/// Deleting a station removes the operators assigned to it
#[utoipa::path(
    delete,
    path = "/{station_id}",
    params(("station_id" = String, Path, description = "Station id")),
    responses(
        (status = 204, description = "Station and its operators deleted"),
        (status = 404, description = "Station not found")
    ),
    tag = "stations"
)]
pub async fn delete_station(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
) -> ApiResult<StatusCode> {
    let txn = state.db.begin().await?;
    operators::Entity::delete_many()
        .filter(operators::Column::StationId.eq(station_id.as_str()))
        .exec(&txn)
        .await?;
    let result = Entity::delete_by_id(station_id.clone()).exec(&txn).await?;
    if result.rows_affected == 0 {
        txn.rollback().await?;
        return Err(not_found!(RESOURCE, station_id));
    }
    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
