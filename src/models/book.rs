//! Book model and request/response types

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Book record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub publication_year: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create book request.
///
/// Every field is optional at the wire level so that missing values are
/// reported by the validator rather than rejected by the JSON extractor.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    /// Integer year; a numeric string is accepted, an empty string means absent
    #[serde(default, deserialize_with = "deserialize_year")]
    #[schema(value_type = Option<i32>, example = 1965)]
    pub publication_year: Option<i32>,
}

/// Create book body, bare or wrapped under a `book` key.
///
/// The shape is picked by the presence of `book`, so a malformed wrapped
/// body is rejected instead of being read as an empty bare one.
#[derive(Debug)]
pub enum CreateBookRequest {
    Wrapped { book: CreateBook },
    Bare(CreateBook),
}

impl<'de> Deserialize<'de> for CreateBookRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut value = serde_json::Value::deserialize(deserializer)?;
        match value.get_mut("book").map(serde_json::Value::take) {
            Some(book) => {
                serde_json::from_value(book).map(|book| CreateBookRequest::Wrapped { book })
            }
            None => serde_json::from_value(value).map(CreateBookRequest::Bare),
        }
        .map_err(de::Error::custom)
    }
}

impl CreateBookRequest {
    pub fn into_inner(self) -> CreateBook {
        match self {
            CreateBookRequest::Wrapped { book } => book,
            CreateBookRequest::Bare(book) => book,
        }
    }
}

/// Record handed to the repository once every rule has passed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub publication_year: i32,
}

/// Book listing filters. Unknown query keys are dropped during extraction.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Exact title
    pub title: Option<String>,
    /// Exact author
    pub author: Option<String>,
    /// Exact genre
    pub genre: Option<String>,
}

impl BookQuery {
    /// True when no key was supplied at all (blank values still count as supplied)
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.genre.is_none()
    }
}

/// Listing response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BooksResponse {
    pub books: Vec<Book>,
}

/// Creation response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookResponse {
    pub book: Book,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum YearInput {
    Int(i64),
    Text(String),
}

fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<YearInput>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(YearInput::Int(v)) => i32::try_from(v)
            .map(Some)
            .map_err(|_| de::Error::custom("publication_year is out of range")),
        Some(YearInput::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<i32>()
                .map(Some)
                .map_err(|_| de::Error::custom("publication_year must be an integer"))
        }
    }
}
