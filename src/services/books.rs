//! Book catalog service: listing and creation

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, NewBook},
    repository::BookRepository,
};

use super::{
    clock::Clock,
    query::build_filter,
    validation::{duplicate_message, BookValidator, ValidationReport, UNIQUENESS},
};

#[derive(Clone)]
pub struct BooksService {
    repository: Arc<dyn BookRepository>,
    validator: BookValidator,
}

impl BooksService {
    pub fn new(repository: Arc<dyn BookRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            validator: BookValidator::new(repository.clone(), clock),
            repository,
        }
    }

    /// List books matching every supplied criterion
    pub async fn list(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        match build_filter(query) {
            Some(filter) if !filter.is_empty() => {
                tracing::debug!("Listing books with {} condition(s)", filter.conditions().len());
                self.repository.find(&filter).await
            }
            _ => self.repository.all().await,
        }
    }

    /// Validate and persist a new book.
    ///
    /// Rule violations come back as [`AppError::Invalid`] with the full report;
    /// nothing is written in that case.
    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        let report = self.validator.validate(data).await?;
        if !report.is_empty() {
            tracing::info!(
                "Book creation rejected: {}",
                report.keys().collect::<Vec<_>>().join(", ")
            );
            return Err(AppError::Invalid(report));
        }

        let new_book = into_new_book(data)?;

        match self.repository.insert(&new_book).await {
            Ok(book) => {
                tracing::info!("Book created: id={} title={:?}", book.id, book.title);
                Ok(book)
            }
            // Lost a race against a concurrent insert of the same book
            Err(AppError::Conflict(msg)) => {
                tracing::info!("Book creation rejected by repository: {}", msg);
                let mut report = ValidationReport::default();
                report.add(UNIQUENESS, duplicate_message(&new_book.title));
                Err(AppError::Invalid(report))
            }
            Err(e) => Err(e),
        }
    }
}

fn into_new_book(data: &CreateBook) -> AppResult<NewBook> {
    match (&data.title, &data.author, &data.genre, data.publication_year) {
        (Some(title), Some(author), Some(genre), Some(publication_year)) => Ok(NewBook {
            title: title.clone(),
            author: author.clone(),
            genre: genre.clone(),
            publication_year,
        }),
        _ => Err(AppError::Internal(
            "validated book is missing a required field".to_string(),
        )),
    }
}
