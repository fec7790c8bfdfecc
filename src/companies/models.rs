use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "Empresa")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "rfc")]
    pub tax_id: String,
    #[sea_orm(column_name = "nombre")]
    pub name: String,
    #[sea_orm(column_name = "calle")]
    pub street: String,
    #[sea_orm(column_name = "colonia")]
    pub neighborhood: String,
    #[sea_orm(column_name = "ciudad")]
    pub city: String,
    #[sea_orm(column_name = "estado")]
    pub state: String,
    #[sea_orm(column_name = "cp")]
    pub postal_code: String,
    #[sea_orm(column_name = "contacto")]
    pub contact: String,
    #[sea_orm(column_name = "correo")]
    pub email: String,
    #[sea_orm(column_name = "telefono")]
    pub phone: String,
    #[sea_orm(column_name = "logotipo", nullable)]
    pub logo: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Company {
    pub tax_id: String,
    pub name: String,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub contact: String,
    pub email: String,
    pub phone: String,
    /// Stored path or URL of the company logo
    pub logo: Option<String>,
}

impl From<Model> for Company {
    fn from(model: Model) -> Self {
        Self {
            tax_id: model.tax_id,
            name: model.name,
            street: model.street,
            neighborhood: model.neighborhood,
            city: model.city,
            state: model.state,
            postal_code: model.postal_code,
            contact: model.contact,
            email: model.email,
            phone: model.phone,
            logo: model.logo,
        }
    }
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct CompanyCreate {
    pub tax_id: String,
    pub name: String,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub contact: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub logo: Option<String>,
}

impl From<CompanyCreate> for ActiveModel {
    fn from(create: CompanyCreate) -> Self {
        ActiveModel {
            tax_id: Set(create.tax_id.trim().to_string()),
            name: Set(create.name),
            street: Set(create.street),
            neighborhood: Set(create.neighborhood),
            city: Set(create.city),
            state: Set(create.state),
            postal_code: Set(create.postal_code),
            contact: Set(create.contact),
            email: Set(create.email),
            phone: Set(create.phone),
            logo: Set(create.logo),
        }
    }
}

/// Partial update: absent fields keep their stored value, `"logo": null` clears the logo
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub street: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub logo: Option<Option<String>>,
}

impl CompanyUpdate {
    pub fn merge_into_activemodel(self, mut model: ActiveModel) -> ActiveModel {
        if let Some(name) = self.name {
            model.name = Set(name);
        }
        if let Some(street) = self.street {
            model.street = Set(street);
        }
        if let Some(neighborhood) = self.neighborhood {
            model.neighborhood = Set(neighborhood);
        }
        if let Some(city) = self.city {
            model.city = Set(city);
        }
        if let Some(state) = self.state {
            model.state = Set(state);
        }
        if let Some(postal_code) = self.postal_code {
            model.postal_code = Set(postal_code);
        }
        if let Some(contact) = self.contact {
            model.contact = Set(contact);
        }
        if let Some(email) = self.email {
            model.email = Set(email);
        }
        if let Some(phone) = self.phone {
            model.phone = Set(phone);
        }
        if let Some(logo) = self.logo {
            model.logo = Set(logo);
        }
        model
    }
}
