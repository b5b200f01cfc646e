//! Business logic services

pub mod catalog;

use std::sync::Arc;

use crate::repository::BooksRepository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
}

impl Services {
    /// Create all services over the given repository
    pub fn new(repository: Arc<dyn BooksRepository>) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository),
        }
    }
}
