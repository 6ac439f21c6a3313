//! Book validation: field rules and the uniqueness check.
//!
//! Every rule runs, and violations are collected per field in rule order
//! (presence, length, range) with the uniqueness check last. An invalid
//! candidate is a normal outcome: it yields a non-empty [`ValidationReport`].

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use validator::ValidateLength;

use super::clock::Clock;
use crate::{
    error::AppResult,
    models::book::CreateBook,
    repository::{BookField, BookFilter, BookRepository, FilterValue},
};

/// Minimum length of title, author and genre
pub const MIN_TEXT_LENGTH: u64 = 2;

pub const BLANK: &str = "can't be blank";

/// Key under which duplicate records are reported
pub const UNIQUENESS: &str = "uniqueness";

/// Field (or rule category) to its ordered violation messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationReport(IndexMap<String, Vec<String>>);

impl ValidationReport {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Append every message of `messages` to `field`
    pub fn extend<I>(&mut self, field: &str, messages: I)
    where
        I: IntoIterator<Item = String>,
    {
        for message in messages {
            self.add(field, message);
        }
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// `"can't be blank"` unless the value has non-whitespace content
pub fn presence(value: Option<&str>) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => None,
        _ => Some(BLANK.to_string()),
    }
}

/// Too-short message when the value has fewer than `min` characters.
/// An absent value counts as zero characters.
pub fn min_length(value: Option<&str>, min: u64) -> Option<String> {
    if value.unwrap_or("").validate_length(Some(min), None, None) {
        None
    } else {
        Some(format!("is too short (minimum is {} characters)", min))
    }
}

/// `"can't be blank"` for a missing year
pub fn year_presence(year: Option<i32>) -> Option<String> {
    match year {
        Some(_) => None,
        None => Some(BLANK.to_string()),
    }
}

/// Range message when `year` is later than `current_year`; absent years pass
pub fn not_after(year: Option<i32>, current_year: i32) -> Option<String> {
    match year {
        Some(y) if y > current_year => Some(format!(
            "must be less than or equal to {}",
            current_year
        )),
        _ => None,
    }
}

pub fn duplicate_message(title: &str) -> String {
    format!("{} already been recommended before.", title)
}

/// Syntactic rules only; no repository access
pub fn check_fields(candidate: &CreateBook, current_year: i32) -> ValidationReport {
    let mut report = ValidationReport::default();

    let text_fields = [
        ("title", candidate.title.as_deref()),
        ("author", candidate.author.as_deref()),
        ("genre", candidate.genre.as_deref()),
    ];
    for (field, value) in text_fields {
        report.extend(
            field,
            [presence(value), min_length(value, MIN_TEXT_LENGTH)]
                .into_iter()
                .flatten(),
        );
    }

    report.extend(
        "publication_year",
        [
            year_presence(candidate.publication_year),
            not_after(candidate.publication_year, current_year),
        ]
        .into_iter()
        .flatten(),
    );

    report
}

/// Full validator: field rules plus the (title, author, publication_year) uniqueness check
#[derive(Clone)]
pub struct BookValidator {
    repository: Arc<dyn BookRepository>,
    clock: Arc<dyn Clock>,
}

impl BookValidator {
    pub fn new(repository: Arc<dyn BookRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Run every rule. Only repository failures are returned as `Err`.
    pub async fn validate(&self, candidate: &CreateBook) -> AppResult<ValidationReport> {
        let mut report = check_fields(candidate, self.clock.current_year());

        if self.is_duplicate(candidate).await? {
            let title = candidate.title.as_deref().unwrap_or_default();
            report.add(UNIQUENESS, duplicate_message(title));
        }

        Ok(report)
    }

    async fn is_duplicate(&self, candidate: &CreateBook) -> AppResult<bool> {
        // Stored rows always carry all three values, so a missing one cannot match
        let (Some(title), Some(author), Some(year)) = (
            candidate.title.as_ref(),
            candidate.author.as_ref(),
            candidate.publication_year,
        ) else {
            return Ok(false);
        };

        let filter = BookFilter::new()
            .where_eq(BookField::Title, FilterValue::Text(title.clone()))
            .where_eq(BookField::Author, FilterValue::Text(author.clone()))
            .where_eq(BookField::PublicationYear, FilterValue::Year(year));

        Ok(!self.repository.find(&filter).await?.is_empty())
    }
}
