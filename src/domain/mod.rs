//! Domain entities exchanged with the content API.

pub mod auth;
pub mod blog;
pub mod car;
pub mod lead;
pub mod message;
pub mod types;
