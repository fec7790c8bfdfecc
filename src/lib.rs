pub mod auth;
pub mod common;
pub mod companies;
pub mod config;
pub mod dashboard;
pub mod formulas;
pub mod ingredients;
pub mod inventory;
pub mod operators;
pub mod production;
pub mod routes;
pub mod stations;
pub mod users;
