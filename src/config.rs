use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub db_url: String,
    pub app_name: String,
    pub deployment: String,
    pub admin_role: String,
    pub jwt_secret: String,
    pub jwt_refresh_secret: String,
    pub access_token_minutes: i64,
    pub refresh_token_hours: i64,
    pub auth_required: bool,
    pub listen_addr: String,
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {value}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok(); // Load from .env file if available

        let db_url = match env::var("DB_URL") {
            Ok(url) => url,
            Err(_) => format!(
                "{}://{}:{}@{}:{}/{}",
                env::var("DB_PREFIX").unwrap_or_else(|_| "postgresql".to_string()),
                required("DB_USER")?,
                required("DB_PASSWORD")?,
                required("DB_HOST")?,
                env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string()),
                required("DB_NAME")?,
            ),
        };

        Ok(Config {
            db_url,
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "formulation-api".to_string()),
            deployment: required("DEPLOYMENT")
                .context("this can be local, dev, stage, or prod")?,
            admin_role: env::var("ADMIN_ROLE").unwrap_or_else(|_| "administrador".to_string()),
            jwt_secret: required("JWT_SECRET")?,
            jwt_refresh_secret: required("JWT_REFRESH_SECRET")?,
            access_token_minutes: parsed_or("ACCESS_TOKEN_MINUTES", 10)?,
            refresh_token_hours: parsed_or("REFRESH_TOKEN_HOURS", 24)?,
            auth_required: parsed_or("AUTH_REQUIRED", true)?,
            listen_addr: env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            db_url: "sqlite::memory:".to_string(),
            app_name: "formulation-api-test".to_string(),
            deployment: "test".to_string(),
            admin_role: "administrador".to_string(),
            jwt_secret: "test-access-secret".to_string(),
            jwt_refresh_secret: "test-refresh-secret".to_string(),
            access_token_minutes: 10,
            refresh_token_hours: 24,
            auth_required: false,
            listen_addr: "127.0.0.1:0".to_string(),
        }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use super::Config;
    use crate::common::state::AppState;
    use crate::routes::build_router;
    use axum::Router;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database, DatabaseConnection};

    /// Fresh, migrated in-memory database. Each call is isolated from the others.
    pub async fn setup_test_db() -> DatabaseConnection {
        let mut options = ConnectOptions::new(Config::for_tests().db_url);
        // A second pooled connection would open a different in-memory database
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let db = Database::connect(options)
            .await
            .expect("Failed to connect to test database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run database migrations");
        db
    }

    pub async fn setup_test_state() -> AppState {
        AppState::new(setup_test_db().await, Config::for_tests())
    }

    pub async fn setup_test_app() -> Router {
        let state = setup_test_state().await;
        build_router(&state.db, &state.config)
    }

    /// Same as `setup_test_app` but with bearer tokens enforced.
    pub async fn setup_protected_test_app() -> (Router, AppState) {
        let mut state = setup_test_state().await;
        state.config.auth_required = true;
        (build_router(&state.db, &state.config), state)
    }
}
