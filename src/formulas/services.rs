use super::lines::models::{self as lines, FormulaLine, FormulaLineInput};
use super::models::{Entity, Formula, FormulaCreate, FormulaUpdate};
use crate::common::errors::{ApiResult, DbErrorExt};
use crate::common::reconcile;
use crate::ingredients::models as ingredients;
use crate::production::models as production;
use crate::{duplicate_resource, not_found, validation_error};
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use std::collections::HashMap;

const RESOURCE: &str = "Formula";
const LINE_RESOURCE: &str = "Formula line";

/// Trim ingredient ids and reject blank, duplicated or negative lines
fn normalize_lines(submitted: Vec<FormulaLineInput>) -> ApiResult<Vec<FormulaLineInput>> {
    let normalized: Vec<FormulaLineInput> = submitted
        .into_iter()
        .map(|mut line| {
            line.ingredient_id = line.ingredient_id.trim().to_string();
            line
        })
        .collect();

    for line in &normalized {
        if line.ingredient_id.is_empty() {
            return Err(validation_error!("lines", "ingredient_id must not be empty"));
        }
        if line.quantity.is_some_and(|q| q.is_sign_negative()) {
            return Err(validation_error!(
                "lines",
                format!("quantity for ingredient '{}' must not be negative", line.ingredient_id)
            ));
        }
        if line.tolerance.is_some_and(|t| t < 0) {
            return Err(validation_error!(
                "lines",
                format!("tolerance for ingredient '{}' must not be negative", line.ingredient_id)
            ));
        }
    }

    if let Some(duplicate) = reconcile::find_duplicate_key(&normalized, |l| l.ingredient_id.clone()) {
        return Err(validation_error!(
            "lines",
            format!("ingredient '{duplicate}' is listed more than once")
        ));
    }
    Ok(normalized)
}

fn new_line(formula_id: &str, input: &FormulaLineInput) -> ApiResult<lines::ActiveModel> {
    let (Some(quantity), Some(tolerance)) = (input.quantity, input.tolerance) else {
        return Err(validation_error!(
            "lines",
            format!(
                "new line for ingredient '{}' requires quantity and tolerance",
                input.ingredient_id
            )
        ));
    };
    Ok(lines::ActiveModel {
        formula_id: Set(formula_id.to_string()),
        ingredient_id: Set(input.ingredient_id.clone()),
        quantity: Set(quantity),
        tolerance: Set(tolerance),
        ..Default::default()
    })
}

fn ingredient_ids(lines: &[FormulaLineInput]) -> Vec<String> {
    lines.iter().map(|l| l.ingredient_id.clone()).collect()
}

/// Lines of the given formulas keyed by formula id, each list ordered by line id
async fn load_lines<C: ConnectionTrait>(
    db: &C,
    formula_ids: Vec<String>,
) -> ApiResult<HashMap<String, Vec<FormulaLine>>> {
    let models = lines::Entity::find()
        .filter(lines::Column::FormulaId.is_in(formula_ids))
        .order_by_asc(lines::Column::LineId)
        .all(db)
        .await?;
    let names = ingredients::names_by_id(
        db,
        models.iter().map(|l| l.ingredient_id.clone()).collect(),
    )
    .await?;

    let mut grouped: HashMap<String, Vec<FormulaLine>> = HashMap::new();
    for model in models {
        let name = names.get(&model.ingredient_id).cloned();
        grouped
            .entry(model.formula_id.clone())
            .or_default()
            .push(FormulaLine::from_model(model, name));
    }
    Ok(grouped)
}

pub async fn get_formula<C: ConnectionTrait>(db: &C, formula_id: &str) -> ApiResult<Formula> {
    let model = Entity::find_by_id(formula_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| not_found!(RESOURCE, formula_id))?;
    let mut lines = load_lines(db, vec![model.formula_id.clone()]).await?;
    let formula_lines = lines.remove(&model.formula_id).unwrap_or_default();
    Ok(Formula::from_model(model, formula_lines))
}

pub async fn list_formulas(db: &DatabaseConnection) -> ApiResult<Vec<Formula>> {
    let models = Entity::find()
        .order_by_asc(super::models::Column::FormulaId)
        .all(db)
        .await?;
    let mut lines = load_lines(db, models.iter().map(|m| m.formula_id.clone()).collect()).await?;

    Ok(models
        .into_iter()
        .map(|model| {
            let formula_lines = lines.remove(&model.formula_id).unwrap_or_default();
            Formula::from_model(model, formula_lines)
        })
        .collect())
}

pub async fn create_formula(db: &DatabaseConnection, payload: FormulaCreate) -> ApiResult<Formula> {
    let formula_id = payload.formula_id.trim().to_string();
    if formula_id.is_empty() {
        return Err(validation_error!("formula_id", "must not be empty"));
    }
    if payload.name.trim().is_empty() {
        return Err(validation_error!("name", "must not be empty"));
    }
    let submitted = normalize_lines(payload.lines.clone())?;
    let new_lines = submitted
        .iter()
        .map(|input| new_line(&formula_id, input))
        .collect::<ApiResult<Vec<_>>>()?;

    let txn = db.begin().await?;
    if Entity::find_by_id(formula_id.clone()).one(&txn).await?.is_some() {
        return Err(duplicate_resource!(RESOURCE, "formula_id"));
    }
    ingredients::ensure_exist(&txn, &ingredient_ids(&submitted)).await?;

    payload
        .to_activemodel()
        .insert(&txn)
        .await
        .for_resource(RESOURCE)?;
    for line in new_lines {
        line.insert(&txn).await.for_resource(LINE_RESOURCE)?;
    }
    txn.commit().await?;

    tracing::info!(formula_id = %formula_id, lines = submitted.len(), "formula created");
    get_formula(db, &formula_id).await
}

/// Make the stored lines of `formula_id` match `submitted`, keyed by ingredient
async fn reconcile_lines(
    txn: &DatabaseTransaction,
    formula_id: &str,
    submitted: Vec<FormulaLineInput>,
) -> ApiResult<()> {
    let existing = lines::Entity::find()
        .filter(lines::Column::FormulaId.eq(formula_id))
        .order_by_asc(lines::Column::LineId)
        .all(txn)
        .await?;

    let plan = reconcile::plan(
        existing,
        submitted,
        |line| line.ingredient_id.clone(),
        |input| input.ingredient_id.clone(),
    );
    // New lines are checked before anything is written
    let creates = plan
        .to_create
        .iter()
        .map(|input| new_line(formula_id, input))
        .collect::<ApiResult<Vec<_>>>()?;

    tracing::debug!(
        formula_id = %formula_id,
        updated = plan.to_update.len(),
        created = creates.len(),
        deleted = plan.to_delete.len(),
        "reconciling formula lines"
    );

    if !plan.to_delete.is_empty() {
        lines::Entity::delete_many()
            .filter(lines::Column::LineId.is_in(plan.to_delete.iter().map(|l| l.line_id)))
            .exec(txn)
            .await?;
    }
    for (line, input) in plan.to_update {
        let mut active: lines::ActiveModel = line.into();
        if let Some(quantity) = input.quantity {
            active.quantity = Set(quantity);
        }
        if let Some(tolerance) = input.tolerance {
            active.tolerance = Set(tolerance);
        }
        if active.is_changed() {
            active.update(txn).await.for_resource(LINE_RESOURCE)?;
        }
    }
    for line in creates {
        line.insert(txn).await.for_resource(LINE_RESOURCE)?;
    }
    Ok(())
}

pub async fn update_formula(
    db: &DatabaseConnection,
    formula_id: &str,
    payload: FormulaUpdate,
) -> ApiResult<Formula> {
    if payload.name.as_ref().is_some_and(|name| name.trim().is_empty()) {
        return Err(validation_error!("name", "must not be empty"));
    }
    // Absent and empty line lists leave the stored lines untouched
    let submitted = normalize_lines(payload.lines.clone().unwrap_or_default())?;

    let txn = db.begin().await?;
    let existing = Entity::find_by_id(formula_id.to_string())
        .one(&txn)
        .await?
        .ok_or_else(|| not_found!(RESOURCE, formula_id))?;

    if !submitted.is_empty() {
        ingredients::ensure_exist(&txn, &ingredient_ids(&submitted)).await?;
        reconcile_lines(&txn, formula_id, submitted).await?;
    }
    let model = payload.merge_into_activemodel(existing.into());
    if model.is_changed() {
        model.update(&txn).await.for_resource(RESOURCE)?;
    }
    txn.commit().await?;

    get_formula(db, formula_id).await
}

/// Deletes the formula and its lines; production orders keep their history with no formula
pub async fn delete_formula(db: &DatabaseConnection, formula_id: &str) -> ApiResult<()> {
    let txn = db.begin().await?;
    if Entity::find_by_id(formula_id.to_string()).one(&txn).await?.is_none() {
        return Err(not_found!(RESOURCE, formula_id));
    }

    let detached = production::Entity::update_many()
        .col_expr(production::Column::FormulaId, Expr::value(Option::<String>::None))
        .filter(production::Column::FormulaId.eq(formula_id))
        .exec(&txn)
        .await?;
    lines::Entity::delete_many()
        .filter(lines::Column::FormulaId.eq(formula_id))
        .exec(&txn)
        .await?;
    Entity::delete_by_id(formula_id.to_string()).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        formula_id = %formula_id,
        orders_detached = detached.rows_affected,
        "formula deleted"
    );
    Ok(())
}
