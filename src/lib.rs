//! Maintrack Equipment Maintenance Server
//!
//! REST JSON API for tracking equipment, maintenance schedules, repair
//! history and suppliers, with email-confirmed registration and role-gated
//! access.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
