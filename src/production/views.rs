use super::models::{
    ProductionFilter, ProductionOrder, ProductionOrderCreate, ProductionOrderUpdate, TagUpdateResult,
};
use super::services;
use crate::common::auth::protect;
use crate::common::errors::ApiResult;
use crate::common::extract::ApiJson;
use crate::common::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router(state: &AppState) -> OpenApiRouter {
    let router = OpenApiRouter::new()
        .routes(routes!(get_all_orders, create_order))
        .routes(routes!(
            get_one_order,
            update_order,
            patch_order,
            delete_order
        ))
        .routes(routes!(delete_orders_by_tag))
        .routes(routes!(deactivate_orders_by_tag))
        .with_state(state.clone());

    protect(router, state, "production")
}

#[utoipa::path(
    get,
    path = "/",
    params(ProductionFilter),
    responses((status = 200, description = "Production orders, newest first", body = Vec<ProductionOrder>)),
    tag = "production"
)]
pub async fn get_all_orders(
    State(state): State<AppState>,
    Query(filter): Query<ProductionFilter>,
) -> ApiResult<Json<Vec<ProductionOrder>>> {
    Ok(Json(services::list_orders(&state.db, filter.status).await?))
}

/// Create a production order together with its weighing details
#[utoipa::path(
    post,
    path = "/",
    request_body = ProductionOrderCreate,
    responses(
        (status = 201, description = "Production order created", body = ProductionOrder),
        (status = 400, description = "Invalid details or unknown reference")
    ),
    tag = "production"
)]
pub async fn create_order(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ProductionOrderCreate>,
) -> ApiResult<(StatusCode, Json<ProductionOrder>)> {
    let order = services::create_order(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[utoipa::path(
    get,
    path = "/{folio}",
    params(("folio" = i32, Path, description = "Production order folio")),
    responses(
        (status = 200, description = "Production order", body = ProductionOrder),
        (status = 404, description = "Production order not found")
    ),
    tag = "production"
)]
pub async fn get_one_order(
    State(state): State<AppState>,
    Path(folio): Path<i32>,
) -> ApiResult<Json<ProductionOrder>> {
    Ok(Json(services::get_order(&state.db, folio).await?))
}

/// Update header fields and reconcile details by ingredient
#[utoipa::path(
    put,
    path = "/{folio}",
    params(("folio" = i32, Path, description = "Production order folio")),
    request_body = ProductionOrderUpdate,
    responses(
        (status = 200, description = "Production order updated", body = ProductionOrder),
        (status = 400, description = "Invalid details or unknown reference"),
        (status = 404, description = "Production order not found")
    ),
    tag = "production"
)]
pub async fn update_order(
    State(state): State<AppState>,
    Path(folio): Path<i32>,
    ApiJson(payload): ApiJson<ProductionOrderUpdate>,
) -> ApiResult<Json<ProductionOrder>> {
    Ok(Json(services::update_order(&state.db, folio, payload).await?))
}

#[utoipa::path(
    patch,
    path = "/{folio}",
    params(("folio" = i32, Path, description = "Production order folio")),
    request_body = ProductionOrderUpdate,
    responses(
        (status = 200, description = "Production order updated", body = ProductionOrder),
        (status = 400, description = "Invalid details or unknown reference"),
        (status = 404, description = "Production order not found")
    ),
    tag = "production"
)]
pub async fn patch_order(
    State(state): State<AppState>,
    Path(folio): Path<i32>,
    ApiJson(payload): ApiJson<ProductionOrderUpdate>,
) -> ApiResult<Json<ProductionOrder>> {
    Ok(Json(services::update_order(&state.db, folio, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/{folio}",
    params(("folio" = i32, Path, description = "Production order folio")),
    responses(
        (status = 204, description = "Production order and its details deleted"),
        (status = 404, description = "Production order not found")
    ),
    tag = "production"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(folio): Path<i32>,
) -> ApiResult<StatusCode> {
    services::delete_order(&state.db, folio).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/tag/{order_tag}",
    params(("order_tag" = String, Path, description = "Work-order label shared by the folios")),
    responses(
        (status = 204, description = "All orders with this tag deleted"),
        (status = 404, description = "No order carries this tag")
    ),
    tag = "production"
)]
pub async fn delete_orders_by_tag(
    State(state): State<AppState>,
    Path(order_tag): Path<String>,
) -> ApiResult<StatusCode> {
    services::delete_orders_by_tag(&state.db, &order_tag).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Put every order with this tag back to pending
#[utoipa::path(
    post,
    path = "/tag/{order_tag}/deactivate",
    params(("order_tag" = String, Path, description = "Work-order label shared by the folios")),
    responses(
        (status = 200, description = "Orders set to pending", body = TagUpdateResult),
        (status = 404, description = "No order carries this tag")
    ),
    tag = "production"
)]
pub async fn deactivate_orders_by_tag(
    State(state): State<AppState>,
    Path(order_tag): Path<String>,
) -> ApiResult<Json<TagUpdateResult>> {
    let updated = services::deactivate_orders_by_tag(&state.db, &order_tag).await?;
    Ok(Json(TagUpdateResult { order_tag, updated }))
}
