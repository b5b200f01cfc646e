//! Bookshelf Library Catalog
//!
//! An HTML web application for listing, searching, creating, updating and
//! deleting the books of a library catalog.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod views;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repository::BooksRepository;
use services::Services;
use views::TemplateEngine;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<Services>,
    pub templates: Arc<TemplateEngine>,
}

impl AppState {
    /// Build the state over a books repository
    pub fn new(config: AppConfig, repository: Arc<dyn BooksRepository>) -> AppResult<Self> {
        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(Services::new(repository)),
            templates: Arc::new(TemplateEngine::new()?),
        })
    }
}
