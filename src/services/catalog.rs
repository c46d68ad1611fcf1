//! Catalog service: book lifecycle.
//!
//! Books are created, replaced, patched and deleted here. Authors and genres are
//! given by name and resolved through [`IdentityResolver`]; the book's single
//! author and genre are maintained through [`RelationshipManager`]. Every write
//! answers with the book reloaded from the store.

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{CreateBook, PatchBook, UpdateBook},
        name::require_text,
        BookDto, NewBook, PersonName,
    },
    repository::{BookStore, SharedStore},
};

use super::{relations::RelationshipManager, resolver::IdentityResolver};

#[derive(Clone)]
pub struct CatalogService {
    store: SharedStore,
    resolver: IdentityResolver,
    relations: RelationshipManager,
}

impl CatalogService {
    pub fn new(store: SharedStore) -> Self {
        Self {
            resolver: IdentityResolver::new(store.clone()),
            relations: RelationshipManager::new(store.clone()),
            store,
        }
    }

    /// List all books ordered by title
    pub async fn list_books(&self) -> AppResult<Vec<BookDto>> {
        let books = self.store.list_books().await?;
        let mut dtos = Vec::with_capacity(books.len());
        for book in books {
            dtos.push(self.relations.book_dto(book).await?);
        }
        Ok(dtos)
    }

    /// Get a book with its current author and genre
    pub async fn get_book(&self, id: i32) -> AppResult<BookDto> {
        let book = self
            .store
            .get_book(id)
            .await?
            .ok_or_else(|| book_not_found(id))?;
        self.relations.book_dto(book).await
    }

    /// Create a book, resolving its author and genre by name
    pub async fn create_book(&self, data: CreateBook) -> AppResult<BookDto> {
        data.validate()?;
        let title = require_text("Title", &data.title)?;
        let author_name =
            PersonName::new(data.author_first_name, data.author_last_name).trimmed("Author")?;
        let genre_name = require_text("Genre name", &data.genre_name)?;

        self.ensure_unique(&title, data.publication_year, None).await?;

        let author = self.resolver.resolve_author(&author_name).await?;
        let genre = self.resolver.resolve_genre(&genre_name).await?;

        let book = self
            .relations
            .attach(
                &NewBook {
                    title,
                    publication_year: data.publication_year,
                },
                author.id,
                genre.id,
            )
            .await?;

        tracing::info!(
            "Catalog: created book id={} author_id={} genre_id={}",
            book.id,
            author.id,
            genre.id
        );
        self.get_book(book.id).await
    }

    /// Replace every field of a book; `id` must match the body
    pub async fn update_book(&self, id: i32, data: UpdateBook) -> AppResult<BookDto> {
        if id != data.id {
            return Err(AppError::Validation(format!(
                "Book id {} in path does not match id {} in body",
                id, data.id
            )));
        }
        data.validate()?;
        let title = require_text("Title", &data.title)?;
        let author_name =
            PersonName::new(data.author_first_name, data.author_last_name).trimmed("Author")?;
        let genre_name = require_text("Genre name", &data.genre_name)?;

        let mut book = self
            .store
            .get_book(id)
            .await?
            .ok_or_else(|| book_not_found(id))?;

        self.ensure_unique(&title, data.publication_year, Some(id)).await?;

        let author = self.resolver.resolve_author(&author_name).await?;
        let genre = self.resolver.resolve_genre(&genre_name).await?;

        book.title = title;
        book.publication_year = data.publication_year;
        self.relations
            .save_with_associations(&book, Some(author.id), Some(genre.id))
            .await?;

        tracing::info!("Catalog: updated book id={}", id);
        self.get_book(id).await
    }

    /// Change only the supplied fields of a book.
    ///
    /// The author needs both names; the duplicate check runs on the merged
    /// title and year before anything is written.
    pub async fn patch_book(&self, id: i32, patch: PatchBook) -> AppResult<BookDto> {
        let title = patch
            .title
            .into_option("Title")?
            .map(|t| require_text("Title", &t))
            .transpose()?;
        let year = patch.publication_year.into_option("Publication year")?;
        let author_name = PersonName::from_pair(
            "Author",
            patch.author_first_name.into_option("Author first name")?,
            patch.author_last_name.into_option("Author last name")?,
        )?
        .map(|name| name.trimmed("Author"))
        .transpose()?;
        let genre_name = patch
            .genre_name
            .into_option("Genre name")?
            .map(|g| require_text("Genre name", &g))
            .transpose()?;

        let mut book = self
            .store
            .get_book(id)
            .await?
            .ok_or_else(|| book_not_found(id))?;

        let row_changed = title.is_some() || year.is_some();
        if let Some(title) = title {
            book.title = title;
        }
        if let Some(year) = year {
            book.publication_year = year;
        }
        self.ensure_unique(&book.title, book.publication_year, Some(id))
            .await?;

        let author = match author_name {
            Some(ref name) => Some(self.resolver.resolve_author(name).await?),
            None => None,
        };
        let genre = match genre_name {
            Some(ref name) => Some(self.resolver.resolve_genre(name).await?),
            None => None,
        };

        if row_changed || author.is_some() || genre.is_some() {
            self.relations
                .save_with_associations(
                    &book,
                    author.map(|a| a.id),
                    genre.map(|g| g.id),
                )
                .await?;
        }

        tracing::info!("Catalog: patched book id={}", id);
        self.get_book(id).await
    }

    /// Delete a book with its reviews and associations
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        if !self.store.book_exists(id).await? {
            return Err(book_not_found(id));
        }
        if !self.store.delete_book(id).await? {
            return Err(AppError::save_failed("the book deletion"));
        }
        tracing::info!("Catalog: deleted book id={}", id);
        Ok(())
    }

    async fn ensure_unique(&self, title: &str, year: i32, exclude_id: Option<i32>) -> AppResult<()> {
        if self
            .store
            .book_duplicate_exists(title, year, exclude_id)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Book '{}' ({}) already exists",
                title, year
            )));
        }
        Ok(())
    }
}

fn book_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Book {} not found", id))
}
