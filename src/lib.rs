//! Library management backend
//!
//! REST JSON API for a small library: a public book catalog, librarian-run
//! member administration and JWT bearer authentication with role-based
//! route policies.

use std::sync::Arc;

pub mod api;
pub mod auth;
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
    pub policy: Arc<auth::policy::RoutePolicy>,
}

impl AppState {
    /// Build services over `repository` with the library route policy
    pub fn new(config: AppConfig, repository: repository::Repository) -> Self {
        let services = services::Services::new(repository, &config.auth);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
            policy: Arc::new(auth::policy::RoutePolicy::library()),
        }
    }
}
