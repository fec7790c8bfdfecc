pub mod lines;
pub mod models;
pub mod services;
pub mod views;
