//! Wire models of the content API and configuration.

pub mod blog;
pub mod car;
pub mod config;
pub mod envelope;
pub mod message;
