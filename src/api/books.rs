//! Book catalog endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::book::{BookQuery, BookResponse, BooksResponse, CreateBookRequest},
};

/// List books, optionally filtered by exact title, author and genre
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Books matching every supplied filter", body = BooksResponse)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<BooksResponse>> {
    let books = state.services.books.list(&query).await?;
    Ok(Json(BooksResponse { books }))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 200, description = "Book created", body = BookResponse),
        (status = 422, description = "Invalid or duplicate book", body = ValidationErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateBookRequest>,
) -> AppResult<Json<BookResponse>> {
    let book = state.services.books.create(&request.into_inner()).await?;
    Ok(Json(BookResponse { book }))
}
