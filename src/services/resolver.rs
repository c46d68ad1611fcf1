//! Identity resolution: turn free-text names into canonical stored entities.
//!
//! The same resolve-or-create algorithm runs for authors (first + last name),
//! genres (name) and reviewers (first + last name). Matching is done on the
//! normalized key; a new entity keeps the trimmed input with its original casing.

use async_trait::async_trait;

use crate::{
    error::{AppError, AppResult},
    models::{name::require_text, Author, Genre, PersonName, Reviewer},
    repository::{AuthorStore, CatalogStore, GenreStore, ReviewerStore, SharedStore},
};

/// An entity identified by a natural key that clients type in as text
#[async_trait]
pub trait NamedEntity: Sized + Send + Sync {
    type Name: Send + Sync;

    /// Label used in messages and logs
    const KIND: &'static str;

    /// Trimmed copy of the name; blank parts are rejected
    fn prepare(name: &Self::Name) -> AppResult<Self::Name>;

    async fn find(store: &dyn CatalogStore, name: &Self::Name) -> AppResult<Option<Self>>;

    async fn insert(store: &dyn CatalogStore, name: &Self::Name) -> AppResult<Self>;

    fn id(&self) -> i32;
}

#[async_trait]
impl NamedEntity for Author {
    type Name = PersonName;
    const KIND: &'static str = "author";

    fn prepare(name: &PersonName) -> AppResult<PersonName> {
        name.trimmed("Author")
    }

    async fn find(store: &dyn CatalogStore, name: &PersonName) -> AppResult<Option<Self>> {
        store.find_author_by_name(name).await
    }

    async fn insert(store: &dyn CatalogStore, name: &PersonName) -> AppResult<Self> {
        store.insert_author(name).await
    }

    fn id(&self) -> i32 {
        self.id
    }
}

#[async_trait]
impl NamedEntity for Genre {
    type Name = String;
    const KIND: &'static str = "genre";

    fn prepare(name: &String) -> AppResult<String> {
        require_text("Genre name", name)
    }

    async fn find(store: &dyn CatalogStore, name: &String) -> AppResult<Option<Self>> {
        store.find_genre_by_name(name).await
    }

    async fn insert(store: &dyn CatalogStore, name: &String) -> AppResult<Self> {
        store.insert_genre(name).await
    }

    fn id(&self) -> i32 {
        self.id
    }
}

#[async_trait]
impl NamedEntity for Reviewer {
    type Name = PersonName;
    const KIND: &'static str = "reviewer";

    fn prepare(name: &PersonName) -> AppResult<PersonName> {
        name.trimmed("Reviewer")
    }

    async fn find(store: &dyn CatalogStore, name: &PersonName) -> AppResult<Option<Self>> {
        store.find_reviewer_by_name(name).await
    }

    async fn insert(store: &dyn CatalogStore, name: &PersonName) -> AppResult<Self> {
        store.insert_reviewer(name).await
    }

    fn id(&self) -> i32 {
        self.id
    }
}

#[derive(Clone)]
pub struct IdentityResolver {
    store: SharedStore,
}

impl IdentityResolver {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Return the stored entity matching `name`, creating it if there is none.
    ///
    /// An existing match is returned unchanged. A failed insert aborts with the
    /// store's error, so callers never link against an unsaved entity.
    pub async fn resolve_or_create<E: NamedEntity>(&self, name: &E::Name) -> AppResult<E> {
        let name = E::prepare(name)?;

        if let Some(existing) = E::find(self.store.as_ref(), &name).await? {
            return Ok(existing);
        }

        match E::insert(self.store.as_ref(), &name).await {
            Ok(created) => {
                tracing::debug!("Resolver: created {} id={}", E::KIND, created.id());
                Ok(created)
            }
            // A concurrent request inserted the same key between our lookup and insert
            Err(AppError::Conflict(_)) => E::find(self.store.as_ref(), &name)
                .await?
                .ok_or_else(|| AppError::save_failed(E::KIND)),
            Err(e) => Err(e),
        }
    }

    pub async fn resolve_author(&self, name: &PersonName) -> AppResult<Author> {
        self.resolve_or_create::<Author>(name).await
    }

    pub async fn resolve_genre(&self, name: &str) -> AppResult<Genre> {
        self.resolve_or_create::<Genre>(&name.to_string()).await
    }

    pub async fn resolve_reviewer(&self, name: &PersonName) -> AppResult<Reviewer> {
        self.resolve_or_create::<Reviewer>(name).await
    }
}
