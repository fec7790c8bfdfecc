use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fields are optional so that a missing value maps to a credentials error
/// instead of a body rejection
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default, alias = "correo")]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access: String,
    pub refresh: String,
    pub role: String,
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AccessTokenResponse {
    pub access: String,
}
