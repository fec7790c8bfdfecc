use super::details::models::{ProductionDetail, ProductionDetailInput};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const STATUS_PENDING: i32 = 0;
pub const STATUS_COMPLETED: i32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "Produccion")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "folio")]
    pub folio: i32,
    #[sea_orm(column_name = "op")]
    pub order_tag: String,
    #[sea_orm(column_name = "IdForm", nullable)]
    pub formula_id: Option<String>,
    #[sea_orm(column_name = "lote", nullable)]
    pub lot: Option<String>,
    #[sea_orm(column_name = "pesform", column_type = "Decimal(Some((12, 3)))", nullable)]
    pub target_weight: Option<Decimal>,
    #[sea_orm(column_name = "estatus")]
    pub status: i32,
    #[sea_orm(column_name = "fecha")]
    pub timestamp: DateTime<Utc>,
    #[sea_orm(column_name = "IdUsu", nullable)]
    pub user_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::formulas::models::Entity",
        from = "Column::FormulaId",
        to = "crate::formulas::models::Column::FormulaId",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Formulas,
    #[sea_orm(
        belongs_to = "crate::users::models::Entity",
        from = "Column::UserId",
        to = "crate::users::models::Column::Rfid",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Users,
    #[sea_orm(has_many = "super::details::models::Entity")]
    Details,
}

impl Related<crate::formulas::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Formulas.def()
    }
}

impl Related<crate::users::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::details::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Details.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductionOrder {
    pub folio: i32,
    /// Work-order label (OP); several folios may share one
    pub order_tag: String,
    pub formula_id: Option<String>,
    pub formula_name: Option<String>,
    pub lot: Option<String>,
    pub target_weight: Option<Decimal>,
    /// 0 = pending, 1 = completed
    pub status: i32,
    pub timestamp: DateTime<Utc>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub details: Vec<ProductionDetail>,
}

impl ProductionOrder {
    pub fn from_model(
        model: Model,
        formula_name: Option<String>,
        user_name: Option<String>,
        details: Vec<ProductionDetail>,
    ) -> Self {
        Self {
            folio: model.folio,
            order_tag: model.order_tag,
            formula_id: model.formula_id,
            formula_name,
            lot: model.lot,
            target_weight: model.target_weight,
            status: model.status,
            timestamp: model.timestamp,
            user_id: model.user_id,
            user_name,
            details,
        }
    }
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct ProductionOrderCreate {
    pub order_tag: String,
    #[serde(default)]
    pub formula_id: Option<String>,
    #[serde(default)]
    pub lot: Option<String>,
    #[serde(default)]
    pub target_weight: Option<Decimal>,
    #[serde(default)]
    pub status: Option<i32>,
    /// Defaults to the time of the request
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub details: Vec<ProductionDetailInput>,
}

impl ProductionOrderCreate {
    pub fn to_activemodel(&self, now: DateTime<Utc>) -> ActiveModel {
        ActiveModel {
            order_tag: Set(self.order_tag.trim().to_string()),
            formula_id: Set(self.formula_id.clone()),
            lot: Set(self.lot.clone()),
            target_weight: Set(self.target_weight),
            status: Set(self.status.unwrap_or(STATUS_PENDING)),
            timestamp: Set(self.timestamp.unwrap_or(now)),
            user_id: Set(self.user_id.clone()),
            ..Default::default()
        }
    }
}

/// Partial update. `details`, when present and non-empty, is reconciled against the stored details.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct ProductionOrderUpdate {
    pub order_tag: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub formula_id: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub lot: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<f64>)]
    pub target_weight: Option<Option<Decimal>>,
    pub status: Option<i32>,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub user_id: Option<Option<String>>,
    pub details: Option<Vec<ProductionDetailInput>>,
}

impl ProductionOrderUpdate {
    pub fn merge_into_activemodel(&self, mut model: ActiveModel) -> ActiveModel {
        if let Some(order_tag) = &self.order_tag {
            model.order_tag = Set(order_tag.trim().to_string());
        }
        if let Some(formula_id) = &self.formula_id {
            model.formula_id = Set(formula_id.clone());
        }
        if let Some(lot) = &self.lot {
            model.lot = Set(lot.clone());
        }
        if let Some(target_weight) = self.target_weight {
            model.target_weight = Set(target_weight);
        }
        if let Some(status) = self.status {
            model.status = Set(status);
        }
        if let Some(timestamp) = self.timestamp {
            model.timestamp = Set(timestamp);
        }
        if let Some(user_id) = &self.user_id {
            model.user_id = Set(user_id.clone());
        }
        model
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductionFilter {
    /// Only orders with this status code
    pub status: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TagUpdateResult {
    pub order_tag: String,
    pub updated: u64,
}
