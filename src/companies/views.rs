use super::models::{ActiveModel, Column, Company, CompanyCreate, CompanyUpdate, Entity};
use crate::common::auth::protect;
use crate::common::errors::{ApiResult, DbErrorExt};
use crate::common::extract::ApiJson;
use crate::common::state::AppState;
use crate::{duplicate_resource, not_found, validation_error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder};
use utoipa_axum::{router::OpenApiRouter, routes};

const RESOURCE: &str = "Company";

pub fn router(state: &AppState) -> OpenApiRouter {
    let router = OpenApiRouter::new()
        .routes(routes!(get_all_companies, create_company))
        .routes(routes!(
            get_one_company,
            update_company,
            patch_company,
            delete_company
        ))
        .with_state(state.clone());

    protect(router, state, "companies")
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "All companies", body = Vec<Company>)
    ),
    tag = "companies"
)]
pub async fn get_all_companies(State(state): State<AppState>) -> ApiResult<Json<Vec<Company>>> {
    let companies = Entity::find()
        .order_by_asc(Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(companies.into_iter().map(Company::from).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    request_body = CompanyCreate,
    responses(
        (status = 201, description = "Company created", body = Company),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Tax id already registered")
    ),
    tag = "companies"
)]
pub async fn create_company(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CompanyCreate>,
) -> ApiResult<(StatusCode, Json<Company>)> {
    let tax_id = payload.tax_id.trim().to_string();
    if tax_id.is_empty() {
        return Err(validation_error!("tax_id", "must not be empty"));
    }
    if Entity::find_by_id(tax_id.clone())
        .one(&state.db)
        .await?
        .is_some()
    {
        return Err(duplicate_resource!(RESOURCE, "tax_id"));
    }

    let company = ActiveModel::from(payload)
        .insert(&state.db)
        .await
        .for_resource(RESOURCE)?;
    Ok((StatusCode::CREATED, Json(company.into())))
}

#[utoipa::path(
    get,
    path = "/{tax_id}",
    params(("tax_id" = String, Path, description = "Company tax id")),
    responses(
        (status = 200, description = "Company", body = Company),
        (status = 404, description = "Company not found")
    ),
    tag = "companies"
)]
pub async fn get_one_company(
    State(state): State<AppState>,
    Path(tax_id): Path<String>,
) -> ApiResult<Json<Company>> {
    let company = Entity::find_by_id(tax_id.clone())
        .one(&state.db)
        .await?
        .ok_or_else(|| not_found!(RESOURCE, tax_id))?;
    Ok(Json(company.into()))
}

async fn apply_update(state: &AppState, tax_id: String, payload: CompanyUpdate) -> ApiResult<Company> {
    let existing = Entity::find_by_id(tax_id.clone())
        .one(&state.db)
        .await?
        .ok_or_else(|| not_found!(RESOURCE, tax_id))?;

    let model = payload.merge_into_activemodel(existing.clone().into());
    if !model.is_changed() {
        return Ok(existing.into());
    }
    let company = model.update(&state.db).await.for_resource(RESOURCE)?;
    Ok(company.into())
}

#[utoipa::path(
    put,
    path = "/{tax_id}",
    params(("tax_id" = String, Path, description = "Company tax id")),
    request_body = CompanyUpdate,
    responses(
        (status = 200, description = "Company updated", body = Company),
        (status = 404, description = "Company not found")
    ),
    tag = "companies"
)]
pub async fn update_company(
    State(state): State<AppState>,
    Path(tax_id): Path<String>,
    ApiJson(payload): ApiJson<CompanyUpdate>,
) -> ApiResult<Json<Company>> {
    Ok(Json(apply_update(&state, tax_id, payload).await?))
}

#[utoipa::path(
    patch,
    path = "/{tax_id}",
    params(("tax_id" = String, Path, description = "Company tax id")),
    request_body = CompanyUpdate,
    responses(
        (status = 200, description = "Company updated", body = Company),
        (status = 404, description = "Company not found")
    ),
    tag = "companies"
)]
pub async fn patch_company(
    State(state): State<AppState>,
    Path(tax_id): Path<String>,
    ApiJson(payload): ApiJson<CompanyUpdate>,
) -> ApiResult<Json<Company>> {
    Ok(Json(apply_update(&state, tax_id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/{tax_id}",
    params(("tax_id" = String, Path, description = "Company tax id")),
    responses(
        (status = 204, description = "Company deleted"),
        (status = 404, description = "Company not found")
    ),
    tag = "companies"
)]
pub async fn delete_company(
    State(state): State<AppState>,
    Path(tax_id): Path<String>,
) -> ApiResult<StatusCode> {
    let result = Entity::delete_by_id(tax_id.clone()).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(not_found!(RESOURCE, tax_id));
    }
    Ok(StatusCode::NO_CONTENT)
}
