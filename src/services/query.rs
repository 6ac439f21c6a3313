//! Listing criteria to repository filter

use crate::{
    models::book::BookQuery,
    repository::{BookField, BookFilter, FilterValue},
};

/// Translate listing criteria into an equality filter.
///
/// Returns `None` when no criterion was supplied, meaning the whole
/// collection. Otherwise title, author and genre are applied in that order,
/// skipping blank values.
pub fn build_filter(query: &BookQuery) -> Option<BookFilter> {
    if query.is_empty() {
        return None;
    }

    let criteria = [
        (BookField::Title, query.title.as_deref()),
        (BookField::Author, query.author.as_deref()),
        (BookField::Genre, query.genre.as_deref()),
    ];

    let filter = criteria
        .into_iter()
        .fold(BookFilter::new(), |filter, (field, value)| match value {
            Some(v) if !v.trim().is_empty() => {
                filter.where_eq(field, FilterValue::Text(v.to_string()))
            }
            _ => filter,
        });

    Some(filter)
}
