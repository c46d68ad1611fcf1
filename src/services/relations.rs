//! Book-author and book-genre association management.
//!
//! Storage models both relations as many-to-many, but the catalog keeps one
//! current author and one current genre per book: every replacement swaps the
//! whole set of a kind for a singleton in one store operation.

use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, BookDto, Genre, LinkKind, NewBook},
    repository::{AuthorStore, BookStore, GenreStore, LinkStore, SharedStore},
};

#[derive(Clone)]
pub struct RelationshipManager {
    store: SharedStore,
}

impl RelationshipManager {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Insert a book already linked to its author and genre.
    ///
    /// Row and links are written as one unit: on failure nothing is stored.
    pub async fn attach(&self, book: &NewBook, author_id: i32, genre_id: i32) -> AppResult<Book> {
        self.store
            .insert_book_with_links(book, author_id, genre_id)
            .await
    }

    /// Save the book row and replace the given associations as one unit.
    ///
    /// `None` keeps the current association of that kind.
    pub async fn save_with_associations(
        &self,
        book: &Book,
        author_id: Option<i32>,
        genre_id: Option<i32>,
    ) -> AppResult<()> {
        if !self
            .store
            .update_book_with_links(book, author_id, genre_id)
            .await?
        {
            return Err(AppError::save_failed("the book"));
        }
        Ok(())
    }

    /// Replace every association of `kind` for the book with exactly `target_id`.
    ///
    /// On failure the previous associations are kept.
    pub async fn set_single_association(
        &self,
        book_id: i32,
        kind: LinkKind,
        target_id: i32,
    ) -> AppResult<()> {
        if !self
            .store
            .replace_book_links(kind, book_id, &[target_id])
            .await?
        {
            return Err(AppError::save_failed(link_label(kind)));
        }
        tracing::debug!("Book {} {:?} association set to {}", book_id, kind, target_id);
        Ok(())
    }

    pub async fn authors_of(&self, book_id: i32) -> AppResult<Vec<Author>> {
        let mut authors = Vec::new();
        for link in self.store.list_book_links(LinkKind::Author, book_id).await? {
            if let Some(author) = self.store.get_author(link.target_id).await? {
                authors.push(author);
            }
        }
        Ok(authors)
    }

    pub async fn genres_of(&self, book_id: i32) -> AppResult<Vec<Genre>> {
        let mut genres = Vec::new();
        for link in self.store.list_book_links(LinkKind::Genre, book_id).await? {
            if let Some(genre) = self.store.get_genre(link.target_id).await? {
                genres.push(genre);
            }
        }
        Ok(genres)
    }

    /// Book together with its current author and genre
    pub async fn book_dto(&self, book: Book) -> AppResult<BookDto> {
        let authors = self.authors_of(book.id).await?;
        let genres = self.genres_of(book.id).await?;
        Ok(BookDto::from_parts(book, &authors, &genres))
    }
}

fn link_label(kind: LinkKind) -> &'static str {
    match kind {
        LinkKind::Author => "the book author",
        LinkKind::Genre => "the book genre",
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{models::PersonName, repository::InMemoryRepository};

    fn dune() -> NewBook {
        NewBook {
            title: "Dune".into(),
            publication_year: 1965,
        }
    }

    async fn setup() -> (Arc<InMemoryRepository>, RelationshipManager, Author, Genre) {
        let store = Arc::new(InMemoryRepository::new());
        let relations = RelationshipManager::new(store.clone());
        let author = store
            .insert_author(&PersonName::new("Frank", "Herbert"))
            .await
            .unwrap();
        let genre = store.insert_genre("Science Fiction").await.unwrap();
        (store, relations, author, genre)
    }

    #[tokio::test]
    async fn test_attach_creates_one_link_of_each_kind() {
        let (_, relations, author, genre) = setup().await;

        let book = relations.attach(&dune(), author.id, genre.id).await.unwrap();

        let dto = relations.book_dto(book).await.unwrap();
        assert_eq!(dto.author_last_name.as_deref(), Some("Herbert"));
        assert_eq!(dto.genre_name.as_deref(), Some("Science Fiction"));
    }

    #[tokio::test]
    async fn test_failed_attach_leaves_no_book() {
        let (store, relations, author, genre) = setup().await;

        store.fail_writes_after(0);
        let err = relations.attach(&dune(), author.id, genre.id).await.unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));

        store.reset_failures();
        assert!(store.list_books().await.unwrap().is_empty());
        assert_eq!(store.link_count(LinkKind::Author).unwrap(), 0);
        assert_eq!(store.link_count(LinkKind::Genre).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_set_single_association_replaces_whole_set() {
        let (store, relations, author, genre) = setup().await;
        let book = relations.attach(&dune(), author.id, genre.id).await.unwrap();
        let coauthor = store
            .insert_author(&PersonName::new("Brian", "Herbert"))
            .await
            .unwrap();
        store
            .replace_book_links(LinkKind::Author, book.id, &[author.id, coauthor.id])
            .await
            .unwrap();

        let replacement = store
            .insert_author(&PersonName::new("Kevin", "Anderson"))
            .await
            .unwrap();
        relations
            .set_single_association(book.id, LinkKind::Author, replacement.id)
            .await
            .unwrap();

        let authors = relations.authors_of(book.id).await.unwrap();
        assert_eq!(authors, vec![replacement]);
        assert_eq!(relations.genres_of(book.id).await.unwrap(), vec![genre]);
    }

    #[tokio::test]
    async fn test_failed_replacement_keeps_previous_association() {
        let (store, relations, author, genre) = setup().await;
        let book = relations.attach(&dune(), author.id, genre.id).await.unwrap();
        let other = store.insert_genre("Horror").await.unwrap();

        store.fail_writes_after(0);
        let err = relations
            .set_single_association(book.id, LinkKind::Genre, other.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));
        let renamed = Book {
            title: "Dune Messiah".into(),
            ..book.clone()
        };
        let err = relations
            .save_with_associations(&renamed, None, Some(other.id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));

        store.reset_failures();
        assert_eq!(relations.genres_of(book.id).await.unwrap(), vec![genre]);
        assert_eq!(store.get_book(book.id).await.unwrap(), Some(book));
    }
}
