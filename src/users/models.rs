use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "Usuarios")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "rfid")]
    pub rfid: String,
    #[sea_orm(column_name = "nombre")]
    pub name: String,
    #[sea_orm(column_name = "correo", unique)]
    pub email: String,
    /// Argon2 PHC string, never serialized
    #[sea_orm(column_name = "password")]
    pub password_hash: String,
    #[sea_orm(column_name = "rol")]
    pub role: String,
    #[sea_orm(column_name = "activo")]
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::production::models::Entity")]
    ProductionOrders,
}

impl Related<crate::production::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductionOrders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub rfid: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub active: bool,
}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            rfid: model.rfid,
            name: model.name,
            email: model.email,
            role: model.role,
            active: model.active,
        }
    }
}

fn default_active() -> bool {
    true
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct UserCreate {
    pub rfid: String,
    pub name: String,
    pub email: String,
    /// Plaintext; stored hashed
    pub password: String,
    pub role: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Plaintext; re-hashed when present
    pub password: Option<String>,
    pub role: Option<String>,
    pub active: Option<bool>,
}

/// Emails are compared case-insensitively and stored lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
