use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "Detalle_Produccion")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "iddetalleproduccion")]
    pub detail_id: i32,
    #[sea_orm(column_name = "FolioProduccion")]
    pub folio: i32,
    #[sea_orm(column_name = "IdIng")]
    pub ingredient_id: String,
    #[sea_orm(column_name = "pesing", column_type = "Decimal(Some((12, 3)))", nullable)]
    pub weighed_amount: Option<Decimal>,
    #[sea_orm(column_name = "pmax", column_type = "Decimal(Some((12, 3)))", nullable)]
    pub max_weight: Option<Decimal>,
    #[sea_orm(column_name = "pmin", column_type = "Decimal(Some((12, 3)))", nullable)]
    pub min_weight: Option<Decimal>,
    #[sea_orm(column_name = "pesado")]
    pub weighed: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::production::models::Entity",
        from = "Column::Folio",
        to = "crate::production::models::Column::Folio",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    ProductionOrders,
    #[sea_orm(
        belongs_to = "crate::ingredients::models::Entity",
        from = "Column::IngredientId",
        to = "crate::ingredients::models::Column::IngredientId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Ingredients,
}

impl Related<crate::production::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductionOrders.def()
    }
}

impl Related<crate::ingredients::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ingredients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductionDetail {
    pub detail_id: i32,
    pub ingredient_id: String,
    pub ingredient_name: Option<String>,
    /// Amount actually weighed for this ingredient
    pub weighed_amount: Option<Decimal>,
    pub max_weight: Option<Decimal>,
    pub min_weight: Option<Decimal>,
    pub weighed: bool,
}

impl ProductionDetail {
    pub fn from_model(model: Model, ingredient_name: Option<String>) -> Self {
        Self {
            detail_id: model.detail_id,
            ingredient_id: model.ingredient_id,
            ingredient_name,
            weighed_amount: model.weighed_amount,
            max_weight: model.max_weight,
            min_weight: model.min_weight,
            weighed: model.weighed,
        }
    }
}

/// One submitted weighing line, matched to stored details by `ingredient_id`
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct ProductionDetailInput {
    pub ingredient_id: String,
    pub weighed_amount: Option<Decimal>,
    pub max_weight: Option<Decimal>,
    pub min_weight: Option<Decimal>,
    pub weighed: Option<bool>,
}
