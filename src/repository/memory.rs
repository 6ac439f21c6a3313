//! In-memory book repository, used by tests and local runs without PostgreSQL

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{BookFilter, BookRepository};
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, NewBook},
};

#[derive(Default)]
struct Store {
    books: Vec<Book>,
    next_id: i64,
}

#[derive(Default)]
pub struct InMemoryBookRepository {
    store: RwLock<Store>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.books.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn find(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        let store = self.store.read().await;
        Ok(store
            .books
            .iter()
            .filter(|book| filter.matches(book))
            .cloned()
            .collect())
    }

    async fn all(&self) -> AppResult<Vec<Book>> {
        Ok(self.store.read().await.books.clone())
    }

    async fn insert(&self, book: &NewBook) -> AppResult<Book> {
        let mut store = self.store.write().await;

        // Same guarantee as the unique index on the books table
        let duplicate = store.books.iter().any(|b| {
            b.title == book.title
                && b.author == book.author
                && b.publication_year == book.publication_year
        });
        if duplicate {
            return Err(AppError::Conflict(format!(
                "{} by {} ({}) already exists",
                book.title, book.author, book.publication_year
            )));
        }

        store.next_id += 1;
        let now = Utc::now();
        let created = Book {
            id: store.next_id,
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            publication_year: book.publication_year,
            created_at: now,
            updated_at: now,
        };
        store.books.push(created.clone());
        Ok(created)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
