//! Bootstrap an administrator account.
//!
//! Usage:
//!   `cargo run --bin create_admin -- --name "Ana" --email ana@planta.mx --password s3cret --rfid RF-001`
//!
//! An existing user with the same email is updated in place (name, password,
//! role, active flag); otherwise a new user is inserted.

use anyhow::Context;
use clap::{Arg, Command};
use console::style;
use formulation_api::auth::password::hash_password;
use formulation_api::config::Config;
use formulation_api::users::models::{ActiveModel, Column, Entity, normalize_email};
use migration::{Migrator, MigratorTrait};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, Database, EntityTrait, QueryFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let matches = Command::new("create_admin")
        .about("Creates or updates an administrator account")
        .arg(
            Arg::new("name")
                .long("name")
                .value_name("NAME")
                .help("Display name")
                .required(true),
        )
        .arg(
            Arg::new("email")
                .long("email")
                .value_name("EMAIL")
                .help("Login email")
                .required(true),
        )
        .arg(
            Arg::new("password")
                .long("password")
                .value_name("PASSWORD")
                .help("Plaintext password, stored hashed")
                .required(true),
        )
        .arg(
            Arg::new("rfid")
                .long("rfid")
                .value_name("RFID")
                .help("Badge tag, used as the user key")
                .required(true),
        )
        .arg(
            Arg::new("role")
                .long("role")
                .value_name("ROLE")
                .help("Role name (defaults to the configured administrative role)"),
        )
        .get_matches();

    let arg = |id: &str| matches.get_one::<String>(id).cloned().unwrap_or_default();
    let name = arg("name");
    let email = normalize_email(&arg("email"));
    let password = arg("password");
    let rfid = arg("rfid").trim().to_string();
    let role = matches
        .get_one::<String>("role")
        .cloned()
        .unwrap_or_else(|| config.admin_role.clone());

    if email.is_empty() || password.is_empty() || rfid.is_empty() {
        anyhow::bail!("email, password and rfid must not be empty");
    }

    println!("{}", style("Formulation API admin bootstrap").bold());
    let db = Database::connect(config.db_url.as_str())
        .await
        .context("Could not connect to the database")?;
    Migrator::up(&db, None)
        .await
        .context("Failed to run migrations")?;

    let password_hash = hash_password(&password).map_err(|err| anyhow::anyhow!(err.to_string()))?;
    let existing = Entity::find()
        .filter(Column::Email.eq(email.as_str()))
        .one(&db)
        .await?;

    match existing {
        Some(user) => {
            let rfid = user.rfid.clone();
            let mut model: ActiveModel = user.into();
            model.name = Set(name);
            model.password_hash = Set(password_hash);
            model.role = Set(role.clone());
            model.active = Set(true);
            model.update(&db).await?;
            println!(
                "{} Updated {} ({}) with role {}",
                style("✔").green(),
                style(&email).cyan(),
                rfid,
                style(&role).bold()
            );
        }
        None => {
            ActiveModel {
                rfid: Set(rfid.clone()),
                name: Set(name),
                email: Set(email.clone()),
                password_hash: Set(password_hash),
                role: Set(role.clone()),
                active: Set(true),
            }
            .insert(&db)
            .await
            .with_context(|| format!("Could not insert user {rfid}"))?;
            println!(
                "{} Created {} ({}) with role {}",
                style("✔").green(),
                style(&email).cyan(),
                rfid,
                style(&role).bold()
            );
        }
    }

    Ok(())
}
