//! Repository layer for book persistence

pub mod books;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::book::{Book, NewBook},
};

/// Book column usable in an equality filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField {
    Title,
    Author,
    Genre,
    PublicationYear,
}

impl BookField {
    pub fn column(&self) -> &'static str {
        match self {
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::Genre => "genre",
            BookField::PublicationYear => "publication_year",
        }
    }
}

/// Value compared against a [`BookField`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Year(i32),
}

/// Exact-match conditions, AND-combined, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    conditions: Vec<(BookField, FilterValue)>,
}

impl BookFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Narrow by `field = value`
    pub fn where_eq(mut self, field: BookField, value: FilterValue) -> Self {
        self.conditions.push((field, value));
        self
    }

    pub fn conditions(&self) -> &[(BookField, FilterValue)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Whether an already loaded book satisfies every condition
    pub fn matches(&self, book: &Book) -> bool {
        self.conditions.iter().all(|(field, value)| match (field, value) {
            (BookField::Title, FilterValue::Text(v)) => &book.title == v,
            (BookField::Author, FilterValue::Text(v)) => &book.author == v,
            (BookField::Genre, FilterValue::Text(v)) => &book.genre == v,
            (BookField::PublicationYear, FilterValue::Year(v)) => book.publication_year == *v,
            _ => false,
        })
    }
}

/// Persistence operations the catalog core relies on.
///
/// `insert` reports a duplicate (title, author, publication_year) triple as
/// [`AppError::Conflict`](crate::error::AppError::Conflict).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Books matching every condition of `filter`, ordered by id
    async fn find(&self, filter: &BookFilter) -> AppResult<Vec<Book>>;

    /// Every book, ordered by id
    async fn all(&self) -> AppResult<Vec<Book>>;

    /// Persist a new book and return it with its assigned id
    async fn insert(&self, book: &NewBook) -> AppResult<Book>;

    /// Connectivity check
    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct holding the book store
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookRepository>,
}

impl Repository {
    /// Create a PostgreSQL-backed repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: Arc::new(books::BooksRepository::new(pool)),
        }
    }

    /// Create a repository kept entirely in process memory
    pub fn in_memory() -> Self {
        Self {
            books: Arc::new(memory::InMemoryBookRepository::new()),
        }
    }
}
