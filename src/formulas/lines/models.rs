use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "Detalle_Formula")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "iddetalle")]
    pub line_id: i32,
    #[sea_orm(column_name = "cantidad", column_type = "Decimal(Some((12, 3)))")]
    pub quantity: Decimal,
    #[sea_orm(column_name = "tolerancia")]
    pub tolerance: i32,
    #[sea_orm(column_name = "idform")]
    pub formula_id: String,
    #[sea_orm(column_name = "iding")]
    pub ingredient_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::formulas::models::Entity",
        from = "Column::FormulaId",
        to = "crate::formulas::models::Column::FormulaId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Formulas,
    #[sea_orm(
        belongs_to = "crate::ingredients::models::Entity",
        from = "Column::IngredientId",
        to = "crate::ingredients::models::Column::IngredientId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Ingredients,
}

impl Related<crate::formulas::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Formulas.def()
    }
}

impl Related<crate::ingredients::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ingredients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct FormulaLine {
    pub line_id: i32,
    pub ingredient_id: String,
    pub ingredient_name: Option<String>,
    pub quantity: Decimal,
    /// Allowed deviation, in percent
    pub tolerance: i32,
}

impl FormulaLine {
    pub fn from_model(model: Model, ingredient_name: Option<String>) -> Self {
        Self {
            line_id: model.line_id,
            ingredient_id: model.ingredient_id,
            ingredient_name,
            quantity: model.quantity,
            tolerance: model.tolerance,
        }
    }
}

/// One submitted recipe line. Lines are matched to stored lines by `ingredient_id`.
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct FormulaLineInput {
    pub ingredient_id: String,
    pub quantity: Option<Decimal>,
    pub tolerance: Option<i32>,
}
