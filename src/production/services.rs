use super::details::models::{self as details, ProductionDetail, ProductionDetailInput};
use super::models::{
    Column, Entity, Model, ProductionOrder, ProductionOrderCreate, ProductionOrderUpdate,
    STATUS_PENDING,
};
use crate::common::errors::{ApiResult, DbErrorExt};
use crate::common::reconcile;
use crate::formulas::models as formulas;
use crate::ingredients::models as ingredients;
use crate::users::models as users;
use crate::{not_found, validation_error};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use std::collections::HashMap;

const RESOURCE: &str = "Production order";
const DETAIL_RESOURCE: &str = "Production detail";

fn normalize_details(submitted: Vec<ProductionDetailInput>) -> ApiResult<Vec<ProductionDetailInput>> {
    let normalized: Vec<ProductionDetailInput> = submitted
        .into_iter()
        .map(|mut detail| {
            detail.ingredient_id = detail.ingredient_id.trim().to_string();
            detail
        })
        .collect();

    for detail in &normalized {
        if detail.ingredient_id.is_empty() {
            return Err(validation_error!("details", "ingredient_id must not be empty"));
        }
        let negative = [detail.weighed_amount, detail.max_weight, detail.min_weight]
            .into_iter()
            .flatten()
            .any(|weight| weight.is_sign_negative());
        if negative {
            return Err(validation_error!(
                "details",
                format!("weights for ingredient '{}' must not be negative", detail.ingredient_id)
            ));
        }
        if let (Some(min), Some(max)) = (detail.min_weight, detail.max_weight) {
            if min > max {
                return Err(validation_error!(
                    "details",
                    format!("min_weight exceeds max_weight for ingredient '{}'", detail.ingredient_id)
                ));
            }
        }
    }

    if let Some(duplicate) = reconcile::find_duplicate_key(&normalized, |d| d.ingredient_id.clone()) {
        return Err(validation_error!(
            "details",
            format!("ingredient '{duplicate}' is listed more than once")
        ));
    }
    Ok(normalized)
}

fn new_detail(folio: i32, input: &ProductionDetailInput) -> details::ActiveModel {
    details::ActiveModel {
        folio: Set(folio),
        ingredient_id: Set(input.ingredient_id.clone()),
        weighed_amount: Set(input.weighed_amount),
        max_weight: Set(input.max_weight),
        min_weight: Set(input.min_weight),
        weighed: Set(input.weighed.unwrap_or(false)),
        ..Default::default()
    }
}

fn validate_status(status: Option<i32>) -> ApiResult<()> {
    if status.is_some_and(|code| code < 0) {
        return Err(validation_error!("status", "must not be negative"));
    }
    Ok(())
}

/// Formula and user references must point at existing rows
async fn ensure_references<C: ConnectionTrait>(
    db: &C,
    formula_id: Option<&str>,
    user_id: Option<&str>,
) -> ApiResult<()> {
    if let Some(formula_id) = formula_id {
        if formulas::Entity::find_by_id(formula_id.to_string())
            .one(db)
            .await?
            .is_none()
        {
            return Err(validation_error!(
                "formula_id",
                format!("unknown formula '{formula_id}'")
            ));
        }
    }
    if let Some(user_id) = user_id {
        if users::Entity::find_by_id(user_id.to_string())
            .one(db)
            .await?
            .is_none()
        {
            return Err(validation_error!("user_id", format!("unknown user '{user_id}'")));
        }
    }
    Ok(())
}

fn ingredient_ids(details: &[ProductionDetailInput]) -> Vec<String> {
    details.iter().map(|d| d.ingredient_id.clone()).collect()
}

pub(crate) async fn formula_names<C: ConnectionTrait>(
    db: &C,
    formula_ids: Vec<String>,
) -> ApiResult<HashMap<String, String>> {
    if formula_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(String, String)> = formulas::Entity::find()
        .select_only()
        .column(formulas::Column::FormulaId)
        .column(formulas::Column::Name)
        .filter(formulas::Column::FormulaId.is_in(formula_ids))
        .into_tuple()
        .all(db)
        .await?;
    Ok(rows.into_iter().collect())
}

pub(crate) async fn user_names<C: ConnectionTrait>(
    db: &C,
    user_ids: Vec<String>,
) -> ApiResult<HashMap<String, String>> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(String, String)> = users::Entity::find()
        .select_only()
        .column(users::Column::Rfid)
        .column(users::Column::Name)
        .filter(users::Column::Rfid.is_in(user_ids))
        .into_tuple()
        .all(db)
        .await?;
    Ok(rows.into_iter().collect())
}

/// Attach details and display names to a batch of orders, keeping their order
pub(crate) async fn assemble<C: ConnectionTrait>(
    db: &C,
    orders: Vec<Model>,
) -> ApiResult<Vec<ProductionOrder>> {
    let folios: Vec<i32> = orders.iter().map(|o| o.folio).collect();
    let detail_models = if folios.is_empty() {
        Vec::new()
    } else {
        details::Entity::find()
            .filter(details::Column::Folio.is_in(folios))
            .order_by_asc(details::Column::DetailId)
            .all(db)
            .await?
    };

    let ingredient_names = ingredients::names_by_id(
        db,
        detail_models.iter().map(|d| d.ingredient_id.clone()).collect(),
    )
    .await?;
    let formula_names =
        formula_names(db, orders.iter().filter_map(|o| o.formula_id.clone()).collect()).await?;
    let user_names = user_names(db, orders.iter().filter_map(|o| o.user_id.clone()).collect()).await?;

    let mut grouped: HashMap<i32, Vec<ProductionDetail>> = HashMap::new();
    for detail in detail_models {
        let name = ingredient_names.get(&detail.ingredient_id).cloned();
        grouped
            .entry(detail.folio)
            .or_default()
            .push(ProductionDetail::from_model(detail, name));
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let formula_name = order
                .formula_id
                .as_ref()
                .and_then(|id| formula_names.get(id).cloned());
            let user_name = order.user_id.as_ref().and_then(|id| user_names.get(id).cloned());
            let order_details = grouped.remove(&order.folio).unwrap_or_default();
            ProductionOrder::from_model(order, formula_name, user_name, order_details)
        })
        .collect())
}

pub async fn get_order<C: ConnectionTrait>(db: &C, folio: i32) -> ApiResult<ProductionOrder> {
    let order = Entity::find_by_id(folio)
        .one(db)
        .await?
        .ok_or_else(|| not_found!(RESOURCE, folio))?;
    let mut assembled = assemble(db, vec![order]).await?;
    assembled
        .pop()
        .ok_or_else(|| not_found!(RESOURCE, folio))
}

/// Newest first, optionally restricted to one status code
pub async fn list_orders(db: &DatabaseConnection, status: Option<i32>) -> ApiResult<Vec<ProductionOrder>> {
    let mut query = Entity::find()
        .order_by_desc(Column::Timestamp)
        .order_by_desc(Column::Folio);
    if let Some(status) = status {
        query = query.filter(Column::Status.eq(status));
    }
    let orders = query.all(db).await?;
    assemble(db, orders).await
}

pub async fn create_order(db: &DatabaseConnection, payload: ProductionOrderCreate) -> ApiResult<ProductionOrder> {
    if payload.order_tag.trim().is_empty() {
        return Err(validation_error!("order_tag", "must not be empty"));
    }
    if payload.target_weight.is_some_and(|w| w.is_sign_negative()) {
        return Err(validation_error!("target_weight", "must not be negative"));
    }
    validate_status(payload.status)?;
    let submitted = normalize_details(payload.details.clone())?;

    let txn = db.begin().await?;
    ensure_references(&txn, payload.formula_id.as_deref(), payload.user_id.as_deref()).await?;
    ingredients::ensure_exist(&txn, &ingredient_ids(&submitted)).await?;

    let order = payload
        .to_activemodel(Utc::now())
        .insert(&txn)
        .await
        .for_resource(RESOURCE)?;
    for input in &submitted {
        new_detail(order.folio, input)
            .insert(&txn)
            .await
            .for_resource(DETAIL_RESOURCE)?;
    }
    txn.commit().await?;

    tracing::info!(folio = order.folio, details = submitted.len(), "production order created");
    get_order(db, order.folio).await
}

async fn reconcile_details(
    txn: &DatabaseTransaction,
    folio: i32,
    submitted: Vec<ProductionDetailInput>,
) -> ApiResult<()> {
    let existing = details::Entity::find()
        .filter(details::Column::Folio.eq(folio))
        .order_by_asc(details::Column::DetailId)
        .all(txn)
        .await?;

    let plan = reconcile::plan(
        existing,
        submitted,
        |detail| detail.ingredient_id.clone(),
        |input| input.ingredient_id.clone(),
    );
    tracing::debug!(
        folio,
        updated = plan.to_update.len(),
        created = plan.to_create.len(),
        deleted = plan.to_delete.len(),
        "reconciling production details"
    );

    if !plan.to_delete.is_empty() {
        details::Entity::delete_many()
            .filter(details::Column::DetailId.is_in(plan.to_delete.iter().map(|d| d.detail_id)))
            .exec(txn)
            .await?;
    }
    for (detail, input) in plan.to_update {
        let mut active: details::ActiveModel = detail.into();
        if let Some(weighed_amount) = input.weighed_amount {
            active.weighed_amount = Set(Some(weighed_amount));
        }
        if let Some(max_weight) = input.max_weight {
            active.max_weight = Set(Some(max_weight));
        }
        if let Some(min_weight) = input.min_weight {
            active.min_weight = Set(Some(min_weight));
        }
        if let Some(weighed) = input.weighed {
            active.weighed = Set(weighed);
        }
        if active.is_changed() {
            active.update(txn).await.for_resource(DETAIL_RESOURCE)?;
        }
    }
    for input in &plan.to_create {
        new_detail(folio, input)
            .insert(txn)
            .await
            .for_resource(DETAIL_RESOURCE)?;
    }
    Ok(())
}

pub async fn update_order(
    db: &DatabaseConnection,
    folio: i32,
    payload: ProductionOrderUpdate,
) -> ApiResult<ProductionOrder> {
    if payload.order_tag.as_ref().is_some_and(|tag| tag.trim().is_empty()) {
        return Err(validation_error!("order_tag", "must not be empty"));
    }
    if payload.target_weight.flatten().is_some_and(|w| w.is_sign_negative()) {
        return Err(validation_error!("target_weight", "must not be negative"));
    }
    validate_status(payload.status)?;
    // Absent and empty detail lists leave the stored details untouched
    let submitted = normalize_details(payload.details.clone().unwrap_or_default())?;

    let txn = db.begin().await?;
    let existing = Entity::find_by_id(folio)
        .one(&txn)
        .await?
        .ok_or_else(|| not_found!(RESOURCE, folio))?;
    ensure_references(
        &txn,
        payload.formula_id.as_ref().and_then(Option::as_deref),
        payload.user_id.as_ref().and_then(Option::as_deref),
    )
    .await?;

    if !submitted.is_empty() {
        ingredients::ensure_exist(&txn, &ingredient_ids(&submitted)).await?;
        reconcile_details(&txn, folio, submitted).await?;
    }
    let model = payload.merge_into_activemodel(existing.into());
    if model.is_changed() {
        model.update(&txn).await.for_resource(RESOURCE)?;
    }
    txn.commit().await?;

    get_order(db, folio).await
}

pub async fn delete_order(db: &DatabaseConnection, folio: i32) -> ApiResult<()> {
    let txn = db.begin().await?;
    details::Entity::delete_many()
        .filter(details::Column::Folio.eq(folio))
        .exec(&txn)
        .await?;
    let result = Entity::delete_by_id(folio).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(not_found!(RESOURCE, folio));
    }
    txn.commit().await?;
    Ok(())
}

/// Delete every order carrying `order_tag`, with their details. Returns the number of orders removed.
pub async fn delete_orders_by_tag(db: &DatabaseConnection, order_tag: &str) -> ApiResult<u64> {
    let txn = db.begin().await?;
    let folios: Vec<i32> = Entity::find()
        .select_only()
        .column(Column::Folio)
        .filter(Column::OrderTag.eq(order_tag))
        .into_tuple()
        .all(&txn)
        .await?;
    if folios.is_empty() {
        return Err(not_found!(RESOURCE, order_tag));
    }

    details::Entity::delete_many()
        .filter(details::Column::Folio.is_in(folios.clone()))
        .exec(&txn)
        .await?;
    let result = Entity::delete_many()
        .filter(Column::Folio.is_in(folios))
        .exec(&txn)
        .await?;
    txn.commit().await?;

    tracing::info!(order_tag, removed = result.rows_affected, "production orders deleted by tag");
    Ok(result.rows_affected)
}

/// Put every order carrying `order_tag` back to pending. Returns the number of orders touched.
pub async fn deactivate_orders_by_tag(db: &DatabaseConnection, order_tag: &str) -> ApiResult<u64> {
    let result = Entity::update_many()
        .col_expr(Column::Status, Expr::value(STATUS_PENDING))
        .filter(Column::OrderTag.eq(order_tag))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(not_found!(RESOURCE, order_tag));
    }
    Ok(result.rows_affected)
}
