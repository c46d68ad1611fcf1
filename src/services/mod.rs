//! Business logic services

pub mod authors;
pub mod catalog;
pub mod genres;
pub mod relations;
pub mod resolver;
pub mod reviewers;
pub mod reviews;

use crate::repository::SharedStore;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub reviews: reviews::ReviewsService,
    pub authors: authors::AuthorsService,
    pub genres: genres::GenresService,
    pub reviewers: reviewers::ReviewersService,
}

impl Services {
    /// Create all services over the given store
    pub fn new(store: SharedStore) -> Self {
        Self {
            catalog: catalog::CatalogService::new(store.clone()),
            reviews: reviews::ReviewsService::new(store.clone()),
            authors: authors::AuthorsService::new(store.clone()),
            genres: genres::GenresService::new(store.clone()),
            reviewers: reviewers::ReviewersService::new(store),
        }
    }
}
