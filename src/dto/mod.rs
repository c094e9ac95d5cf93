//! View-facing shapes produced by the services.

pub mod dashboard;
pub mod listing;
pub mod widget;
