use super::errors::ApiError;
use super::state::AppState;
use crate::auth::tokens;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::{self, Next};
use axum::response::Response;
use utoipa_axum::router::OpenApiRouter;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Role {
    Administrator,
    Unknown(String),
}

impl Role {
    /// Roles are stored as free text, so surrounding whitespace and case are ignored
    pub fn parse(value: &str, admin_role: &str) -> Self {
        let value = value.trim();
        if value.to_lowercase() == admin_role.trim().to_lowercase() {
            Role::Administrator
        } else {
            Role::Unknown(value.to_string())
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Administrator)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Administrator => f.write_str("administrator"),
            Role::Unknown(unknown) => f.write_fmt(format_args!("Unknown role: {unknown}")),
        }
    }
}

/// Rejects requests without a valid access token and exposes its claims to handlers
pub async fn require_access_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = {
        let token = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::InvalidToken("missing bearer token".to_string()))?;
        tokens::decode_access(token.trim(), &state.config)?
    };

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

pub fn protect(router: OpenApiRouter, state: &AppState, resource: &str) -> OpenApiRouter {
    if state.config.auth_required {
        router.layer(middleware::from_fn_with_state(
            state.clone(),
            require_access_token,
        ))
    } else {
        tracing::warn!("Routes of {resource} router are not protected");
        router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("administrador")]
    #[case("Administrador")]
    #[case("  ADMINISTRADOR ")]
    fn test_admin_role_is_case_insensitive(#[case] stored: &str) {
        assert_eq!(Role::parse(stored, "administrador"), Role::Administrator);
    }

    #[rstest]
    #[case("operador")]
    #[case("admin")]
    #[case("")]
    fn test_other_roles_are_unknown(#[case] stored: &str) {
        let role = Role::parse(stored, "administrador");
        assert!(!role.is_admin());
        assert_eq!(role, Role::Unknown(stored.trim().to_string()));
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Administrator.to_string(), "administrator");
        assert_eq!(
            Role::Unknown("operador".to_string()).to_string(),
            "Unknown role: operador"
        );
    }
}
