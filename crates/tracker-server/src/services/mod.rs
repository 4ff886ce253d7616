//! Business logic services

pub mod auth;
pub mod charts;

pub use auth::AuthService;
pub use charts::ChartCatalog;
