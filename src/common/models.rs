use crate::config::Config;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Deserialize, Serialize, Default)]
pub struct UIConfiguration {
    #[serde(rename = "appName")]
    pub app_name: String,
    pub deployment: String,
    #[serde(rename = "authRequired")]
    pub auth_required: bool,
}

impl UIConfiguration {
    pub fn new(config: &Config) -> Self {
        Self {
            app_name: config.app_name.clone(),
            deployment: config.deployment.clone(),
            auth_required: config.auth_required,
        }
    }
}

#[derive(ToSchema, Deserialize, Serialize)]
pub struct HealthCheck {
    pub status: String,
}
