use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "Operadores")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "rfid")]
    pub rfid: String,
    #[sea_orm(column_name = "nombre")]
    pub name: String,
    #[sea_orm(column_name = "password")]
    pub password_hash: String,
    #[sea_orm(column_name = "idest")]
    pub station_id: String,
    #[sea_orm(column_name = "activo")]
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::stations::models::Entity",
        from = "Column::StationId",
        to = "crate::stations::models::Column::StationId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Stations,
}

impl Related<crate::stations::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Operator {
    pub rfid: String,
    pub name: String,
    pub station_id: String,
    pub active: bool,
}

impl From<Model> for Operator {
    fn from(model: Model) -> Self {
        Self {
            rfid: model.rfid,
            name: model.name,
            station_id: model.station_id,
            active: model.active,
        }
    }
}

fn default_active() -> bool {
    true
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct OperatorCreate {
    pub rfid: String,
    pub name: String,
    pub password: String,
    pub station_id: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct OperatorUpdate {
    pub name: Option<String>,
    pub password: Option<String>,
    pub station_id: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct OperatorFilter {
    /// Only operators with this active flag
    pub active: Option<bool>,
}
