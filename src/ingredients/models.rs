use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryFilter, QuerySelect};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "Ingredientes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "iding")]
    pub ingredient_id: String,
    #[sea_orm(column_name = "nombre")]
    pub name: String,
    #[sea_orm(column_name = "presentacion", column_type = "Decimal(Some((12, 3)))")]
    pub unit_size: Decimal,
    #[sea_orm(column_name = "observaciones", column_type = "Text", nullable)]
    pub notes: Option<String>,
    #[sea_orm(column_name = "pesado")]
    pub weighed: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::formulas::lines::models::Entity")]
    FormulaLines,
    #[sea_orm(has_many = "crate::production::details::models::Entity")]
    ProductionDetails,
}

impl Related<crate::formulas::lines::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FormulaLines.def()
    }
}

impl Related<crate::production::details::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductionDetails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Ingredient {
    pub ingredient_id: String,
    pub name: String,
    /// Presentation size of one unit (bag, drum...)
    pub unit_size: Decimal,
    pub notes: Option<String>,
    /// Whether the ingredient is weighed at a station
    pub weighed: bool,
}

impl From<Model> for Ingredient {
    fn from(model: Model) -> Self {
        Self {
            ingredient_id: model.ingredient_id,
            name: model.name,
            unit_size: model.unit_size,
            notes: model.notes,
            weighed: model.weighed,
        }
    }
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct IngredientCreate {
    pub ingredient_id: String,
    pub name: String,
    pub unit_size: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub weighed: bool,
}

impl From<IngredientCreate> for ActiveModel {
    fn from(create: IngredientCreate) -> Self {
        ActiveModel {
            ingredient_id: Set(create.ingredient_id.trim().to_string()),
            name: Set(create.name),
            unit_size: Set(create.unit_size),
            notes: Set(create.notes),
            weighed: Set(create.weighed),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct IngredientUpdate {
    pub name: Option<String>,
    pub unit_size: Option<Decimal>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
    pub weighed: Option<bool>,
}

impl IngredientUpdate {
    pub fn merge_into_activemodel(self, mut model: ActiveModel) -> ActiveModel {
        if let Some(name) = self.name {
            model.name = Set(name);
        }
        if let Some(unit_size) = self.unit_size {
            model.unit_size = Set(unit_size);
        }
        if let Some(notes) = self.notes {
            model.notes = Set(notes);
        }
        if let Some(weighed) = self.weighed {
            model.weighed = Set(weighed);
        }
        model
    }
}

/// Ids from `ingredient_ids` that have no ingredient row, in input order
pub async fn find_missing<C: ConnectionTrait>(
    db: &C,
    ingredient_ids: &[String],
) -> Result<Vec<String>, DbErr> {
    if ingredient_ids.is_empty() {
        return Ok(Vec::new());
    }
    let found: Vec<String> = Entity::find()
        .select_only()
        .column(Column::IngredientId)
        .filter(Column::IngredientId.is_in(ingredient_ids.iter().cloned()))
        .into_tuple()
        .all(db)
        .await?;

    Ok(ingredient_ids
        .iter()
        .filter(|id| !found.contains(id))
        .cloned()
        .collect())
}

/// Ingredient names keyed by id, for the given ids
pub async fn names_by_id<C: ConnectionTrait>(
    db: &C,
    ingredient_ids: Vec<String>,
) -> Result<std::collections::HashMap<String, String>, DbErr> {
    if ingredient_ids.is_empty() {
        return Ok(std::collections::HashMap::new());
    }
    let rows: Vec<(String, String)> = Entity::find()
        .select_only()
        .column(Column::IngredientId)
        .column(Column::Name)
        .filter(Column::IngredientId.is_in(ingredient_ids))
        .into_tuple()
        .all(db)
        .await?;
    Ok(rows.into_iter().collect())
}

/// Fails with a validation error naming every id without an ingredient row
pub async fn ensure_exist<C: ConnectionTrait>(
    db: &C,
    ingredient_ids: &[String],
) -> Result<(), crate::common::errors::ApiError> {
    let missing = find_missing(db, ingredient_ids).await?;
    if missing.is_empty() {
        Ok(())
    } else {
        Err(crate::validation_error!(
            "ingredient_id",
            format!("unknown ingredient(s): {}", missing.join(", "))
        ))
    }
}
