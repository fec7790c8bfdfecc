use super::models::{InventoryQuery, InventoryRow};
use super::services::inventory;
use crate::common::auth::protect;
use crate::common::errors::ApiResult;
use crate::common::state::AppState;
use axum::extract::{Query, State};
use axum::response::Json;
use chrono::Utc;
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router(state: &AppState) -> OpenApiRouter {
    let router = OpenApiRouter::new()
        .routes(routes!(get_inventory))
        .with_state(state.clone());

    protect(router, state, "inventory")
}

#[utoipa::path(
    get,
    path = "/",
    params(InventoryQuery),
    responses(
        (status = 200, description = "Production orders with weighed totals", body = Vec<InventoryRow>),
        (status = 400, description = "Malformed date or status")
    ),
    tag = "inventory"
)]
pub async fn get_inventory(
    State(state): State<AppState>,
    Query(query): Query<InventoryQuery>,
) -> ApiResult<Json<Vec<InventoryRow>>> {
    Ok(Json(inventory(&state.db, &query, Utc::now()).await?))
}
