pub mod cache;
pub mod events;
pub mod guard;
pub mod notifications;
pub mod session;
