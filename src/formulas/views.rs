use super::models::{Formula, FormulaCreate, FormulaUpdate};
use super::services;
use crate::common::auth::protect;
use crate::common::errors::ApiResult;
use crate::common::extract::ApiJson;
use crate::common::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router(state: &AppState) -> OpenApiRouter {
    let router = OpenApiRouter::new()
        .routes(routes!(get_all_formulas, create_formula))
        .routes(routes!(
            get_one_formula,
            update_formula,
            patch_formula,
            delete_formula
        ))
        .with_state(state.clone());

    protect(router, state, "formulas")
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "All formulas with their lines", body = Vec<Formula>)),
    tag = "formulas"
)]
pub async fn get_all_formulas(State(state): State<AppState>) -> ApiResult<Json<Vec<Formula>>> {
    Ok(Json(services::list_formulas(&state.db).await?))
}

/// Create a formula together with its full set of lines
#[utoipa::path(
    post,
    path = "/",
    request_body = FormulaCreate,
    responses(
        (status = 201, description = "Formula created", body = Formula),
        (status = 400, description = "Invalid lines or unknown ingredient"),
        (status = 409, description = "Formula id already exists")
    ),
    tag = "formulas"
)]
pub async fn create_formula(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<FormulaCreate>,
) -> ApiResult<(StatusCode, Json<Formula>)> {
    let formula = services::create_formula(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(formula)))
}

#[utoipa::path(
    get,
    path = "/{formula_id}",
    params(("formula_id" = String, Path, description = "Formula id")),
    responses(
        (status = 200, description = "Formula", body = Formula),
        (status = 404, description = "Formula not found")
    ),
    tag = "formulas"
)]
pub async fn get_one_formula(
    State(state): State<AppState>,
    Path(formula_id): Path<String>,
) -> ApiResult<Json<Formula>> {
    Ok(Json(services::get_formula(&state.db, &formula_id).await?))
}

/// Update header fields and reconcile lines by ingredient
#[utoipa::path(
    put,
    path = "/{formula_id}",
    params(("formula_id" = String, Path, description = "Formula id")),
    request_body = FormulaUpdate,
    responses(
        (status = 200, description = "Formula updated", body = Formula),
        (status = 400, description = "Invalid lines or unknown ingredient"),
        (status = 404, description = "Formula not found")
    ),
    tag = "formulas"
)]
pub async fn update_formula(
    State(state): State<AppState>,
    Path(formula_id): Path<String>,
    ApiJson(payload): ApiJson<FormulaUpdate>,
) -> ApiResult<Json<Formula>> {
    Ok(Json(
        services::update_formula(&state.db, &formula_id, payload).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/{formula_id}",
    params(("formula_id" = String, Path, description = "Formula id")),
    request_body = FormulaUpdate,
    responses(
        (status = 200, description = "Formula updated", body = Formula),
        (status = 400, description = "Invalid lines or unknown ingredient"),
        (status = 404, description = "Formula not found")
    ),
    tag = "formulas"
)]
pub async fn patch_formula(
    State(state): State<AppState>,
    Path(formula_id): Path<String>,
    ApiJson(payload): ApiJson<FormulaUpdate>,
) -> ApiResult<Json<Formula>> {
    Ok(Json(
        services::update_formula(&state.db, &formula_id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/{formula_id}",
    params(("formula_id" = String, Path, description = "Formula id")),
    responses(
        (status = 204, description = "Formula and its lines deleted"),
        (status = 404, description = "Formula not found")
    ),
    tag = "formulas"
)]
pub async fn delete_formula(
    State(state): State<AppState>,
    Path(formula_id): Path<String>,
) -> ApiResult<StatusCode> {
    services::delete_formula(&state.db, &formula_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
