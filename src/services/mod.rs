//! Business logic services

pub mod books;
pub mod clock;
pub mod query;
pub mod validation;

use std::sync::Arc;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository and time source
    pub fn new(repository: Repository, clock: Arc<dyn clock::Clock>) -> Self {
        Self {
            books: books::BooksService::new(repository.books.clone(), clock),
            repository,
        }
    }

    /// Check that the backing store answers
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        self.repository.books.ping().await
    }
}
