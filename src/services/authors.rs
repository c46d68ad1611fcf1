//! Authors service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{CreateAuthor, UpdateAuthor},
        Author, BookDto, PersonName,
    },
    repository::{AuthorStore, SharedStore},
};

use super::relations::RelationshipManager;

#[derive(Clone)]
pub struct AuthorsService {
    store: SharedStore,
    relations: RelationshipManager,
}

impl AuthorsService {
    pub fn new(store: SharedStore) -> Self {
        Self {
            relations: RelationshipManager::new(store.clone()),
            store,
        }
    }

    pub async fn list_authors(&self) -> AppResult<Vec<Author>> {
        self.store.list_authors().await
    }

    pub async fn get_author(&self, id: i32) -> AppResult<Author> {
        self.store
            .get_author(id)
            .await?
            .ok_or_else(|| author_not_found(id))
    }

    pub async fn create_author(&self, data: CreateAuthor) -> AppResult<Author> {
        data.validate()?;
        let name = PersonName::from(&data).trimmed("Author")?;

        if self.store.find_author_by_name(&name).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Author {} {} already exists",
                name.first_name, name.last_name
            )));
        }

        let author = self.store.insert_author(&name).await?;
        tracing::info!("Authors: created author id={}", author.id);
        Ok(author)
    }

    /// Rename an author; the new name must not belong to another author
    pub async fn update_author(&self, id: i32, data: UpdateAuthor) -> AppResult<Author> {
        data.validate()?;
        let name = PersonName::from(&data).trimmed("Author")?;
        let mut author = self.get_author(id).await?;

        if let Some(existing) = self.store.find_author_by_name(&name).await? {
            if existing.id != id {
                return Err(AppError::Conflict(format!(
                    "Author {} {} already exists",
                    name.first_name, name.last_name
                )));
            }
        }

        author.first_name = name.first_name;
        author.last_name = name.last_name;
        if !self.store.update_author(&author).await? {
            return Err(AppError::save_failed("the author"));
        }
        tracing::info!("Authors: updated author id={}", id);
        Ok(author)
    }

    /// Delete an author that no book references anymore
    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        if !self.store.author_exists(id).await? {
            return Err(author_not_found(id));
        }
        if !self.store.list_books_by_author(id).await?.is_empty() {
            return Err(AppError::Conflict(format!(
                "Author {} is still linked to books",
                id
            )));
        }
        if !self.store.delete_author(id).await? {
            return Err(AppError::save_failed("the author deletion"));
        }
        tracing::info!("Authors: deleted author id={}", id);
        Ok(())
    }

    pub async fn books_by_author(&self, id: i32) -> AppResult<Vec<BookDto>> {
        if !self.store.author_exists(id).await? {
            return Err(author_not_found(id));
        }
        let mut books = Vec::new();
        for book in self.store.list_books_by_author(id).await? {
            books.push(self.relations.book_dto(book).await?);
        }
        Ok(books)
    }
}

fn author_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Author {} not found", id))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        models::book::CreateBook, repository::InMemoryRepository, services::catalog::CatalogService,
    };

    fn author(first: &str, last: &str) -> CreateAuthor {
        CreateAuthor {
            first_name: first.to_string(),
            last_name: last.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name() {
        let service = AuthorsService::new(Arc::new(InMemoryRepository::new()));
        let created = service.create_author(author(" Jack ", "London")).await.unwrap();
        assert_eq!(created.first_name, "Jack");

        let err = service.create_author(author("jack", "LONDON")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_rename_collision_conflicts() {
        let service = AuthorsService::new(Arc::new(InMemoryRepository::new()));
        service.create_author(author("Jack", "London")).await.unwrap();
        let ash = service.create_author(author("Ash", "Ketchum")).await.unwrap();

        assert!(matches!(
            service.update_author(ash.id, author("Jack", "London")).await,
            Err(AppError::Conflict(_))
        ));
        // Re-casing its own name is allowed
        let renamed = service.update_author(ash.id, author("ASH", "Ketchum")).await.unwrap();
        assert_eq!(renamed.first_name, "ASH");
        assert!(matches!(
            service.update_author(999, author("A", "B")).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_refused_while_linked() {
        let store = Arc::new(InMemoryRepository::new());
        let service = AuthorsService::new(store.clone());
        let catalog = CatalogService::new(store.clone());
        catalog
            .create_book(CreateBook {
                title: "The Call of the Wild".to_string(),
                publication_year: 1903,
                author_first_name: "Jack".to_string(),
                author_last_name: "London".to_string(),
                genre_name: "Adventure".to_string(),
            })
            .await
            .unwrap();
        let jack = store.list_authors().await.unwrap().remove(0);

        let books = service.books_by_author(jack.id).await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].genre_name.as_deref(), Some("Adventure"));

        assert!(matches!(
            service.delete_author(jack.id).await,
            Err(AppError::Conflict(_))
        ));

        catalog.delete_book(books[0].id).await.unwrap();
        service.delete_author(jack.id).await.unwrap();
        assert!(matches!(
            service.get_author(jack.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
