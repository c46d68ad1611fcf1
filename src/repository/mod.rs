//! Store layer: the persistence contract of the catalog and its implementations.
//!
//! Each entity kind has its own trait; [`CatalogStore`] bundles them so services
//! can hold a single `Arc<dyn CatalogStore>`. Two implementations exist:
//!
//! - [`Repository`]: Postgres through a sqlx pool (production)
//! - [`memory::InMemoryRepository`]: process-local state (tests, `memory` backend)
//!
//! Boolean mutations return `true` only when at least one row was affected.
//! Natural keys are unique on their normalized form; a store reports a clash
//! as [`AppError::Conflict`](crate::error::AppError::Conflict).

pub mod authors;
pub mod books;
pub mod genres;
pub mod links;
pub mod memory;
pub mod reviewers;
pub mod reviews;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        Author, Book, BookLink, Genre, LinkKind, NewBook, NewReview, PersonName, Review, Reviewer,
    },
};

pub use memory::InMemoryRepository;

#[async_trait]
pub trait AuthorStore: Send + Sync {
    async fn list_authors(&self) -> AppResult<Vec<Author>>;
    async fn get_author(&self, id: i32) -> AppResult<Option<Author>>;
    async fn author_exists(&self, id: i32) -> AppResult<bool>;
    /// Lookup by normalized first and last name
    async fn find_author_by_name(&self, name: &PersonName) -> AppResult<Option<Author>>;
    async fn insert_author(&self, name: &PersonName) -> AppResult<Author>;
    async fn update_author(&self, author: &Author) -> AppResult<bool>;
    async fn delete_author(&self, id: i32) -> AppResult<bool>;
    async fn list_books_by_author(&self, author_id: i32) -> AppResult<Vec<Book>>;
}

#[async_trait]
pub trait GenreStore: Send + Sync {
    async fn list_genres(&self) -> AppResult<Vec<Genre>>;
    async fn get_genre(&self, id: i32) -> AppResult<Option<Genre>>;
    async fn genre_exists(&self, id: i32) -> AppResult<bool>;
    async fn find_genre_by_name(&self, name: &str) -> AppResult<Option<Genre>>;
    async fn insert_genre(&self, name: &str) -> AppResult<Genre>;
    async fn update_genre(&self, genre: &Genre) -> AppResult<bool>;
    /// Removes the genre and all of its book-genre links as one unit
    async fn delete_genre(&self, id: i32) -> AppResult<bool>;
    async fn list_books_by_genre(&self, genre_id: i32) -> AppResult<Vec<Book>>;
}

#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books ordered by title
    async fn list_books(&self) -> AppResult<Vec<Book>>;
    async fn get_book(&self, id: i32) -> AppResult<Option<Book>>;
    async fn book_exists(&self, id: i32) -> AppResult<bool>;
    /// First book (lowest id) whose normalized title matches
    async fn get_book_by_title(&self, title: &str) -> AppResult<Option<Book>>;
    /// True if another book has the same normalized title and year
    async fn book_duplicate_exists(
        &self,
        title: &str,
        publication_year: i32,
        exclude_id: Option<i32>,
    ) -> AppResult<bool>;
    async fn insert_book(&self, book: &NewBook) -> AppResult<Book>;
    /// Inserts the book with its single author link and single genre link as one unit
    async fn insert_book_with_links(
        &self,
        book: &NewBook,
        author_id: i32,
        genre_id: i32,
    ) -> AppResult<Book>;
    async fn update_book(&self, book: &Book) -> AppResult<bool>;
    /// Updates the book row and, for each id given, replaces the links of that
    /// kind with it, as one unit. False (nothing written) if the book is gone.
    async fn update_book_with_links(
        &self,
        book: &Book,
        author_id: Option<i32>,
        genre_id: Option<i32>,
    ) -> AppResult<bool>;
    /// Removes the book's reviews, author links, genre links and the book row as one unit
    async fn delete_book(&self, id: i32) -> AppResult<bool>;
}

#[async_trait]
pub trait ReviewerStore: Send + Sync {
    /// All reviewers ordered by last then first name
    async fn list_reviewers(&self) -> AppResult<Vec<Reviewer>>;
    async fn get_reviewer(&self, id: i32) -> AppResult<Option<Reviewer>>;
    async fn reviewer_exists(&self, id: i32) -> AppResult<bool>;
    async fn find_reviewer_by_name(&self, name: &PersonName) -> AppResult<Option<Reviewer>>;
    async fn insert_reviewer(&self, name: &PersonName) -> AppResult<Reviewer>;
    async fn update_reviewer(&self, reviewer: &Reviewer) -> AppResult<bool>;
    async fn delete_reviewer(&self, id: i32) -> AppResult<bool>;
    async fn list_reviews_by_reviewer(&self, reviewer_id: i32) -> AppResult<Vec<Review>>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn list_reviews(&self) -> AppResult<Vec<Review>>;
    async fn get_review(&self, id: i32) -> AppResult<Option<Review>>;
    async fn review_exists(&self, id: i32) -> AppResult<bool>;
    async fn insert_review(&self, review: &NewReview) -> AppResult<Review>;
    async fn update_review(&self, review: &Review) -> AppResult<bool>;
    async fn delete_review(&self, id: i32) -> AppResult<bool>;
    async fn list_reviews_by_book(&self, book_id: i32) -> AppResult<Vec<Review>>;
}

#[async_trait]
pub trait LinkStore: Send + Sync {
    async fn list_book_links(&self, kind: LinkKind, book_id: i32) -> AppResult<Vec<BookLink>>;
    async fn insert_book_link(&self, link: &BookLink) -> AppResult<bool>;
    /// Replaces every link of `kind` for the book with `target_ids`, atomically
    async fn replace_book_links(
        &self,
        kind: LinkKind,
        book_id: i32,
        target_ids: &[i32],
    ) -> AppResult<bool>;
}

/// The full store contract used by the services
pub trait CatalogStore:
    AuthorStore + GenreStore + BookStore + ReviewerStore + ReviewStore + LinkStore
{
}

impl<T> CatalogStore for T where
    T: AuthorStore + GenreStore + BookStore + ReviewerStore + ReviewStore + LinkStore
{
}

pub type SharedStore = Arc<dyn CatalogStore>;

/// Postgres-backed store holding the database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Round-trip to the database (readiness probe)
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
