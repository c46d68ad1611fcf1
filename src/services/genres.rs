//! Genres service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        genre::{CreateGenre, UpdateGenre},
        name::require_text,
        BookDto, Genre,
    },
    repository::{GenreStore, SharedStore},
};

use super::relations::RelationshipManager;

#[derive(Clone)]
pub struct GenresService {
    store: SharedStore,
    relations: RelationshipManager,
}

impl GenresService {
    pub fn new(store: SharedStore) -> Self {
        Self {
            relations: RelationshipManager::new(store.clone()),
            store,
        }
    }

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.store.list_genres().await
    }

    pub async fn get_genre(&self, id: i32) -> AppResult<Genre> {
        self.store
            .get_genre(id)
            .await?
            .ok_or_else(|| genre_not_found(id))
    }

    pub async fn create_genre(&self, data: CreateGenre) -> AppResult<Genre> {
        data.validate()?;
        let name = require_text("Genre name", &data.name)?;

        if self.store.find_genre_by_name(&name).await?.is_some() {
            return Err(AppError::Conflict(format!("Genre '{}' already exists", name)));
        }

        let genre = self.store.insert_genre(&name).await?;
        tracing::info!("Genres: created genre id={}", genre.id);
        Ok(genre)
    }

    pub async fn update_genre(&self, id: i32, data: UpdateGenre) -> AppResult<Genre> {
        data.validate()?;
        let name = require_text("Genre name", &data.name)?;
        let mut genre = self.get_genre(id).await?;

        if let Some(existing) = self.store.find_genre_by_name(&name).await? {
            if existing.id != id {
                return Err(AppError::Conflict(format!("Genre '{}' already exists", name)));
            }
        }

        genre.name = name;
        if !self.store.update_genre(&genre).await? {
            return Err(AppError::save_failed("the genre"));
        }
        tracing::info!("Genres: updated genre id={}", id);
        Ok(genre)
    }

    /// Delete a genre together with its book associations; the books stay
    pub async fn delete_genre(&self, id: i32) -> AppResult<()> {
        if !self.store.genre_exists(id).await? {
            return Err(genre_not_found(id));
        }
        if !self.store.delete_genre(id).await? {
            return Err(AppError::save_failed("the genre deletion"));
        }
        tracing::info!("Genres: deleted genre id={}", id);
        Ok(())
    }

    pub async fn books_by_genre(&self, id: i32) -> AppResult<Vec<BookDto>> {
        if !self.store.genre_exists(id).await? {
            return Err(genre_not_found(id));
        }
        let mut books = Vec::new();
        for book in self.store.list_books_by_genre(id).await? {
            books.push(self.relations.book_dto(book).await?);
        }
        Ok(books)
    }
}

fn genre_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Genre {} not found", id))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        models::book::CreateBook, repository::InMemoryRepository, services::catalog::CatalogService,
    };

    fn genre(name: &str) -> CreateGenre {
        CreateGenre {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_rename() {
        let service = GenresService::new(Arc::new(InMemoryRepository::new()));
        let leaf = service.create_genre(genre(" Leaf ")).await.unwrap();
        assert_eq!(leaf.name, "Leaf");
        assert!(matches!(
            service.create_genre(genre("LEAF")).await,
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            service.create_genre(genre("  ")).await,
            Err(AppError::Validation(_))
        ));

        service.create_genre(genre("Romance")).await.unwrap();
        assert!(matches!(
            service.update_genre(leaf.id, genre("romance")).await,
            Err(AppError::Conflict(_))
        ));
        let renamed = service.update_genre(leaf.id, genre("Grass")).await.unwrap();
        assert_eq!(service.get_genre(leaf.id).await.unwrap(), renamed);
    }

    #[tokio::test]
    async fn test_delete_removes_associations_but_keeps_books() {
        let store = Arc::new(InMemoryRepository::new());
        let service = GenresService::new(store.clone());
        let catalog = CatalogService::new(store.clone());
        let book = catalog
            .create_book(CreateBook {
                title: "Stranger".to_string(),
                publication_year: 1996,
                author_first_name: "Harry".to_string(),
                author_last_name: "Potter".to_string(),
                genre_name: "Romance".to_string(),
            })
            .await
            .unwrap();
        let romance = store.find_genre_by_name("romance").await.unwrap().unwrap();
        assert_eq!(service.books_by_genre(romance.id).await.unwrap().len(), 1);

        service.delete_genre(romance.id).await.unwrap();

        let reloaded = catalog.get_book(book.id).await.unwrap();
        assert_eq!(reloaded.genre_name, None);
        assert_eq!(reloaded.author_last_name.as_deref(), Some("Potter"));
        assert!(matches!(
            service.books_by_genre(romance.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_genre(romance.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
