pub mod auth;
pub mod exchange;
pub mod health;
pub mod transactions;
pub mod users;
