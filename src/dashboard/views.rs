use super::models::{DashboardData, DashboardQuery};
use super::services::dashboard_data;
use crate::common::auth::protect;
use crate::common::errors::ApiResult;
use crate::common::state::AppState;
use axum::extract::{Query, State};
use axum::response::Json;
use chrono::Utc;
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router(state: &AppState) -> OpenApiRouter {
    let router = OpenApiRouter::new()
        .routes(routes!(get_dashboard_data))
        .with_state(state.clone());

    protect(router, state, "dashboard")
}

#[utoipa::path(
    get,
    path = "/",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Production KPIs, weekly series and rankings", body = DashboardData),
        (status = 400, description = "Malformed date")
    ),
    tag = "dashboard"
)]
pub async fn get_dashboard_data(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<DashboardData>> {
    Ok(Json(dashboard_data(&state.db, &query, Utc::now()).await?))
}
