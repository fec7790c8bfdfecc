use super::models::{ActiveModel, Column, Entity, Ingredient, IngredientCreate, IngredientUpdate};
use crate::common::auth::protect;
use crate::common::errors::{ApiResult, DbErrorExt};
use crate::common::extract::ApiJson;
use crate::common::state::AppState;
use crate::formulas::lines::models as formula_lines;
use crate::production::details::models as production_details;
use crate::{duplicate_resource, not_found, validation_error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait};
use utoipa_axum::{router::OpenApiRouter, routes};

const RESOURCE: &str = "Ingredient";

pub fn router(state: &AppState) -> OpenApiRouter {
    let router = OpenApiRouter::new()
        .routes(routes!(get_all_ingredients, create_ingredient))
        .routes(routes!(
            get_one_ingredient,
            update_ingredient,
            patch_ingredient,
            delete_ingredient
        ))
        .with_state(state.clone());

    protect(router, state, "ingredients")
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "All ingredients", body = Vec<Ingredient>)),
    tag = "ingredients"
)]
pub async fn get_all_ingredients(State(state): State<AppState>) -> ApiResult<Json<Vec<Ingredient>>> {
    let ingredients = Entity::find()
        .order_by_asc(Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(ingredients.into_iter().map(Ingredient::from).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    request_body = IngredientCreate,
    responses(
        (status = 201, description = "Ingredient created", body = Ingredient),
        (status = 409, description = "Ingredient id already exists")
    ),
    tag = "ingredients"
)]
pub async fn create_ingredient(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<IngredientCreate>,
) -> ApiResult<(StatusCode, Json<Ingredient>)> {
    let ingredient_id = payload.ingredient_id.trim().to_string();
    if ingredient_id.is_empty() {
        return Err(validation_error!("ingredient_id", "must not be empty"));
    }
    if payload.unit_size.is_sign_negative() {
        return Err(validation_error!("unit_size", "must not be negative"));
    }
    if Entity::find_by_id(ingredient_id).one(&state.db).await?.is_some() {
        return Err(duplicate_resource!(RESOURCE, "ingredient_id"));
    }

    let ingredient = ActiveModel::from(payload)
        .insert(&state.db)
        .await
        .for_resource(RESOURCE)?;
    Ok((StatusCode::CREATED, Json(ingredient.into())))
}

#[utoipa::path(
    get,
    path = "/{ingredient_id}",
    params(("ingredient_id" = String, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Ingredient", body = Ingredient),
        (status = 404, description = "Ingredient not found")
    ),
    tag = "ingredients"
)]
pub async fn get_one_ingredient(
    State(state): State<AppState>,
    Path(ingredient_id): Path<String>,
) -> ApiResult<Json<Ingredient>> {
    let ingredient = Entity::find_by_id(ingredient_id.clone())
        .one(&state.db)
        .await?
        .ok_or_else(|| not_found!(RESOURCE, ingredient_id))?;
    Ok(Json(ingredient.into()))
}

async fn apply_update(
    state: &AppState,
    ingredient_id: String,
    payload: IngredientUpdate,
) -> ApiResult<Ingredient> {
    if payload.unit_size.is_some_and(|size| size.is_sign_negative()) {
        return Err(validation_error!("unit_size", "must not be negative"));
    }
    let existing = Entity::find_by_id(ingredient_id.clone())
        .one(&state.db)
        .await?
        .ok_or_else(|| not_found!(RESOURCE, ingredient_id))?;
    let model = payload.merge_into_activemodel(existing.clone().into());
    if !model.is_changed() {
        return Ok(existing.into());
    }
    let ingredient = model.update(&state.db).await.for_resource(RESOURCE)?;
    Ok(ingredient.into())
}

#[utoipa::path(
    put,
    path = "/{ingredient_id}",
    params(("ingredient_id" = String, Path, description = "Ingredient id")),
    request_body = IngredientUpdate,
    responses(
        (status = 200, description = "Ingredient updated", body = Ingredient),
        (status = 404, description = "Ingredient not found")
    ),
    tag = "ingredients"
)]
pub async fn update_ingredient(
    State(state): State<AppState>,
    Path(ingredient_id): Path<String>,
    ApiJson(payload): ApiJson<IngredientUpdate>,
) -> ApiResult<Json<Ingredient>> {
    Ok(Json(apply_update(&state, ingredient_id, payload).await?))
}

#[utoipa::path(
    patch,
    path = "/{ingredient_id}",
    params(("ingredient_id" = String, Path, description = "Ingredient id")),
    request_body = IngredientUpdate,
    responses(
        (status = 200, description = "Ingredient updated", body = Ingredient),
        (status = 404, description = "Ingredient not found")
    ),
    tag = "ingredients"
)]
pub async fn patch_ingredient(
    State(state): State<AppState>,
    Path(ingredient_id): Path<String>,
    ApiJson(payload): ApiJson<IngredientUpdate>,
) -> ApiResult<Json<Ingredient>> {
    Ok(Json(apply_update(&state, ingredient_id, payload).await?))
}

/// Deleting an ingredient removes the formula lines and production details that use it
#[utoipa::path(
    delete,
    path = "/{ingredient_id}",
    params(("ingredient_id" = String, Path, description = "Ingredient id")),
    responses(
        (status = 204, description = "Ingredient deleted"),
        (status = 404, description = "Ingredient not found")
    ),
    tag = "ingredients"
)]
pub async fn delete_ingredient(
    State(state): State<AppState>,
    Path(ingredient_id): Path<String>,
) -> ApiResult<StatusCode> {
    let txn = state.db.begin().await?;
    if Entity::find_by_id(ingredient_id.clone()).one(&txn).await?.is_none() {
        txn.rollback().await?;
        return Err(not_found!(RESOURCE, ingredient_id));
    }

    formula_lines::Entity::delete_many()
        .filter(formula_lines::Column::IngredientId.eq(ingredient_id.as_str()))
        .exec(&txn)
        .await?;
    production_details::Entity::delete_many()
        .filter(production_details::Column::IngredientId.eq(ingredient_id.as_str()))
        .exec(&txn)
        .await?;
    Entity::delete_by_id(ingredient_id).exec(&txn).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
