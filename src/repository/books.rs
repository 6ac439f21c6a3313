//! PostgreSQL book repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::{BookFilter, BookRepository, FilterValue};
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, NewBook},
};

const SELECT_BOOKS: &str =
    "SELECT id, title, author, genre, publication_year, created_at, updated_at FROM books";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Build `SELECT ... WHERE a = $1 AND b = $2 ... ORDER BY id` for `filter`.
/// Column names come from [`BookField::column`](super::BookField::column); values are always bound.
fn select_query(filter: &BookFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(SELECT_BOOKS);

    for (i, (field, value)) in filter.conditions().iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        builder.push(field.column());
        builder.push(" = ");
        match value {
            FilterValue::Text(v) => builder.push_bind(v.clone()),
            FilterValue::Year(v) => builder.push_bind(*v),
        };
    }

    builder.push(" ORDER BY id");
    builder
}

#[async_trait]
impl BookRepository for BooksRepository {
    async fn find(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        let mut builder = select_query(filter);
        let rows = builder
            .build_query_as::<Book>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn all(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(&format!("{} ORDER BY id", SELECT_BOOKS))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert(&self, book: &NewBook) -> AppResult<Book> {
        let result = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, genre, publication_year)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, author, genre, publication_year, created_at, updated_at
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.genre)
        .bind(book.publication_year)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(AppError::Conflict(format!(
                    "{} by {} ({}) already exists",
                    book.title, book.author, book.publication_year
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
