pub mod auth;
pub mod errors;
pub mod extract;
pub mod models;
pub mod reconcile;
pub mod state;
pub mod views;

#[cfg(test)]
pub mod test_helpers;
