//! Book junction records (N:M relationships to authors and genres)

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Which join relation a link belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Author,
    Genre,
}

impl LinkKind {
    pub fn table(self) -> &'static str {
        match self {
            LinkKind::Author => "book_authors",
            LinkKind::Genre => "book_genres",
        }
    }

    pub fn target_column(self) -> &'static str {
        match self {
            LinkKind::Author => "author_id",
            LinkKind::Genre => "genre_id",
        }
    }
}

/// Junction row linking a book to an author or a genre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct BookLink {
    pub kind: LinkKind,
    pub book_id: i32,
    pub target_id: i32,
}
