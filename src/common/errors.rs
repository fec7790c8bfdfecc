use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;
use thiserror::Error;

/// Every failure a handler can surface to the caller
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input, missing fields, unresolvable references (400 Bad Request)
    #[error("Validation failed for field '{field}': {message}")]
    Validation { field: String, message: String },
    /// Login attempted without email or password (400 Bad Request)
    #[error("Email and password are required")]
    MissingCredentials,
    /// Unknown email or wrong password, deliberately indistinguishable (401 Unauthorized)
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// Missing, malformed or expired bearer/refresh token (401 Unauthorized)
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    /// Account exists but is not active (403 Forbidden)
    #[error("Account disabled")]
    AccountDisabled,
    /// Account lacks the administrative role (403 Forbidden)
    #[error("Permission denied")]
    PermissionDenied,
    /// Resource not found (404 Not Found)
    #[error("{resource} with id '{id}' not found")]
    NotFound { resource: String, id: String },
    /// Duplicate resource (409 Conflict)
    #[error("{resource} with this {field} already exists")]
    Duplicate { resource: String, field: String },
    /// Unexpected persistence failure (500 Internal Server Error)
    #[error("Database error: {0}")]
    Database(DbErr),
    /// Generic application error (500 Internal Server Error)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::MissingCredentials => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            ApiError::AccountDisabled | ApiError::PermissionDenied => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Duplicate { .. } => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::MissingCredentials => "MISSING_CREDENTIALS",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::InvalidToken(_) => "INVALID_TOKEN",
            ApiError::AccountDisabled => "ACCOUNT_DISABLED",
            ApiError::PermissionDenied => "PERMISSION_DENIED",
            ApiError::NotFound { .. } => "RESOURCE_NOT_FOUND",
            ApiError::Duplicate { .. } => "DUPLICATE_RESOURCE",
            ApiError::Database(_) => "DATABASE_ERROR",
            ApiError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Map a database error with the name of the resource being written
    pub fn from_db(err: DbErr, resource: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => ApiError::Duplicate {
                resource: resource.to_string(),
                field: constraint_field(&detail),
            },
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => ApiError::Validation {
                field: resource.to_string(),
                message: format!("references a record that does not exist ({detail})"),
            },
            _ => match err {
                DbErr::RecordNotFound(id) => ApiError::NotFound {
                    resource: resource.to_string(),
                    id,
                },
                other => ApiError::Database(other),
            },
        }
    }
}

fn constraint_field(detail: &str) -> String {
    if detail.contains("correo") || detail.contains("email") {
        "email".to_string()
    } else if detail.contains("iding") {
        "ingredient".to_string()
    } else {
        "key".to_string()
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        ApiError::from_db(err, "record")
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation {
            field: "body".to_string(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

/// Convenience macros for creating API errors
#[macro_export]
macro_rules! validation_error {
    ($field:expr, $message:expr) => {
        $crate::common::errors::ApiError::Validation {
            field: $field.to_string(),
            message: $message.to_string(),
        }
    };
}

#[macro_export]
macro_rules! not_found {
    ($resource:expr, $id:expr) => {
        $crate::common::errors::ApiError::NotFound {
            resource: $resource.to_string(),
            id: $id.to_string(),
        }
    };
}

#[macro_export]
macro_rules! duplicate_resource {
    ($resource:expr, $field:expr) => {
        $crate::common::errors::ApiError::Duplicate {
            resource: $resource.to_string(),
            field: $field.to_string(),
        }
    };
}

/// Extension trait to attach the resource name when converting a `DbErr`
pub trait DbErrorExt<T> {
    fn for_resource(self, resource: &str) -> Result<T, ApiError>;
}

impl<T> DbErrorExt<T> for Result<T, DbErr> {
    fn for_resource(self, resource: &str) -> Result<T, ApiError> {
        self.map_err(|err| ApiError::from_db(err, resource))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_validation_error_creation() {
        let err = validation_error!("lines", "duplicate ingredient 'A'");
        assert!(matches!(err, ApiError::Validation { .. }));
        assert_eq!(
            err.to_string(),
            "Validation failed for field 'lines': duplicate ingredient 'A'"
        );
    }

    #[rstest]
    #[case(validation_error!("name", "required"), StatusCode::BAD_REQUEST)]
    #[case(ApiError::MissingCredentials, StatusCode::BAD_REQUEST)]
    #[case(ApiError::InvalidCredentials, StatusCode::UNAUTHORIZED)]
    #[case(ApiError::InvalidToken("expired".into()), StatusCode::UNAUTHORIZED)]
    #[case(ApiError::AccountDisabled, StatusCode::FORBIDDEN)]
    #[case(ApiError::PermissionDenied, StatusCode::FORBIDDEN)]
    #[case(not_found!("Formula", "F1"), StatusCode::NOT_FOUND)]
    #[case(duplicate_resource!("User", "email"), StatusCode::CONFLICT)]
    #[case(ApiError::Internal { message: "boom".into() }, StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_error_status_mapping(#[case] err: ApiError, #[case] expected: StatusCode) {
        assert_eq!(err.status(), expected);
        assert_eq!(err.into_response().status(), expected);
    }

    #[test]
    fn test_record_not_found_maps_to_not_found() {
        let err = ApiError::from_db(DbErr::RecordNotFound("F9".to_string()), "Formula");
        match err {
            ApiError::NotFound { resource, id } => {
                assert_eq!(resource, "Formula");
                assert_eq!(id, "F9");
            }
            other => panic!("Expected not found error, got {other:?}"),
        }
    }

    #[test]
    fn test_other_db_errors_are_internal() {
        let err: ApiError = DbErr::Custom("connection reset".to_string()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "DATABASE_ERROR");
    }
}
