//! Book model, request bodies and the hydrated response shape

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{author::Author, genre::Genre, patch::Patch};

/// Book row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub publication_year: i32,
}

/// Book row before insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub publication_year: i32,
}

/// Book as returned to clients, rebuilt from the stored graph after every write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookDto {
    pub id: i32,
    pub title: String,
    pub publication_year: i32,
    /// Current author (None only if a previous association write failed)
    pub author_first_name: Option<String>,
    pub author_last_name: Option<String>,
    /// Current genre
    pub genre_name: Option<String>,
}

impl BookDto {
    pub fn from_parts(book: Book, authors: &[Author], genres: &[Genre]) -> Self {
        let author = authors.first();
        Self {
            id: book.id,
            title: book.title,
            publication_year: book.publication_year,
            author_first_name: author.map(|a| a.first_name.clone()),
            author_last_name: author.map(|a| a.last_name.clone()),
            genre_name: genres.first().map(|g| g.name.clone()),
        }
    }
}

/// Create book request: author and genre are given by name and resolved server-side
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub publication_year: i32,
    #[validate(length(min = 1, message = "Author first name is required"))]
    pub author_first_name: String,
    #[validate(length(min = 1, message = "Author last name is required"))]
    pub author_last_name: String,
    #[validate(length(min = 1, message = "Genre name is required"))]
    pub genre_name: String,
}

/// Full update request; `id` must match the path
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    pub id: i32,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub publication_year: i32,
    #[validate(length(min = 1, message = "Author first name is required"))]
    pub author_first_name: String,
    #[validate(length(min = 1, message = "Author last name is required"))]
    pub author_last_name: String,
    #[validate(length(min = 1, message = "Genre name is required"))]
    pub genre_name: String,
}

/// Partial update request: omitted fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PatchBook {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub title: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub publication_year: Patch<i32>,
    /// Must be supplied together with `author_last_name`
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub author_first_name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub author_last_name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub genre_name: Patch<String>,
}
