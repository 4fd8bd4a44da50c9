pub mod appointments;
pub mod auth;
pub mod client;
pub mod inventory;
pub mod prescriptions;
pub mod reports;
pub mod users;

pub use client::ApiClient;
