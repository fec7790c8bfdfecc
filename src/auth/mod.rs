pub mod models;
pub mod password;
pub mod services;
pub mod tokens;
pub mod views;

#[cfg(test)]
mod tests;
