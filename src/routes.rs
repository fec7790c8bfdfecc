use crate::common::state::AppState;
use crate::config::Config;
use crate::{
    auth, companies, dashboard, formulas, ingredients, inventory, operators, production, stations,
    users,
};
use axum::{Router, extract::DefaultBodyLimit};
use sea_orm::DatabaseConnection;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

pub fn build_router(db: &DatabaseConnection, config: &Config) -> Router {
    #[derive(OpenApi)]
    #[openapi(
        modifiers(&SecurityAddon),
        security(
            ("bearerAuth" = [])
        )
    )]
    struct ApiDoc;

    struct SecurityAddon;

    impl utoipa::Modify for SecurityAddon {
        fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
            if let Some(components) = openapi.components.as_mut() {
                components.add_security_scheme(
                    "bearerAuth",
                    utoipa::openapi::security::SecurityScheme::Http(
                        utoipa::openapi::security::HttpBuilder::new()
                            .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                            .bearer_format("JWT")
                            .build(),
                    ),
                );
            }
        }
    }

    let app_state: AppState = AppState::new(db.clone(), config.clone());

    // Build the router with OpenAPI documentation
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(crate::common::views::router(&app_state)) // Root routes
        .merge(auth::views::router(&app_state))
        .nest("/api/companies", companies::views::router(&app_state))
        .nest("/api/stations", stations::views::router(&app_state))
        .nest(
            "/api/ingredients",
            ingredients::views::router(&app_state),
        )
        .nest("/api/formulas", formulas::views::router(&app_state))
        .nest(
            "/api/production",
            production::views::router(&app_state),
        )
        .nest("/api/users", users::views::router(&app_state))
        .nest("/api/operators", operators::views::router(&app_state))
        .nest(
            "/api/dashboard_data",
            dashboard::views::router(&app_state),
        )
        .nest("/api/inventory", inventory::views::router(&app_state))
        .split_for_parts();

    router
        .merge(Scalar::with_url("/api/docs", api))
        .layer(DefaultBodyLimit::max(30 * 1024 * 1024))
}
