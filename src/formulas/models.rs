use super::lines::models::{FormulaLine, FormulaLineInput};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "Formulas")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "idform")]
    pub formula_id: String,
    #[sea_orm(column_name = "folio", nullable)]
    pub batch_code: Option<String>,
    #[sea_orm(column_name = "nombre")]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::lines::models::Entity")]
    Lines,
    #[sea_orm(has_many = "crate::production::models::Entity")]
    ProductionOrders,
}

impl Related<super::lines::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lines.def()
    }
}

impl Related<crate::production::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductionOrders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Formula {
    pub formula_id: String,
    pub batch_code: Option<String>,
    pub name: String,
    pub lines: Vec<FormulaLine>,
}

impl Formula {
    pub fn from_model(model: Model, lines: Vec<FormulaLine>) -> Self {
        Self {
            formula_id: model.formula_id,
            batch_code: model.batch_code,
            name: model.name,
            lines,
        }
    }
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct FormulaCreate {
    pub formula_id: String,
    #[serde(default)]
    pub batch_code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub lines: Vec<FormulaLineInput>,
}

impl FormulaCreate {
    pub fn to_activemodel(&self) -> ActiveModel {
        ActiveModel {
            formula_id: Set(self.formula_id.trim().to_string()),
            batch_code: Set(self.batch_code.clone()),
            name: Set(self.name.clone()),
        }
    }
}

/// Partial update. `lines`, when present and non-empty, is reconciled against the stored lines.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct FormulaUpdate {
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub batch_code: Option<Option<String>>,
    pub name: Option<String>,
    pub lines: Option<Vec<FormulaLineInput>>,
}

impl FormulaUpdate {
    pub fn merge_into_activemodel(&self, mut model: ActiveModel) -> ActiveModel {
        if let Some(batch_code) = &self.batch_code {
            model.batch_code = Set(batch_code.clone());
        }
        if let Some(name) = &self.name {
            model.name = Set(name.clone());
        }
        model
    }
}
