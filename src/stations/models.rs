use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "Estaciones")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "idest")]
    pub station_id: String,
    #[sea_orm(column_name = "nombre")]
    pub name: String,
    #[sea_orm(column_name = "obs", column_type = "Text", nullable)]
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::operators::models::Entity")]
    Operators,
}

impl Related<crate::operators::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Operators.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Station {
    pub station_id: String,
    pub name: String,
    pub notes: Option<String>,
}

impl From<Model> for Station {
    fn from(model: Model) -> Self {
        Self {
            station_id: model.station_id,
            name: model.name,
            notes: model.notes,
        }
    }
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct StationCreate {
    pub station_id: String,
    pub name: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<StationCreate> for ActiveModel {
    fn from(create: StationCreate) -> Self {
        ActiveModel {
            station_id: Set(create.station_id.trim().to_string()),
            name: Set(create.name),
            notes: Set(create.notes),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct StationUpdate {
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

impl StationUpdate {
    pub fn merge_into_activemodel(self, mut model: ActiveModel) -> ActiveModel {
        if let Some(name) = self.name {
            model.name = Set(name);
        }
        if let Some(notes) = self.notes {
            model.notes = Set(notes);
        }
        model
    }
}
