//! Bookshelf catalog server
//!
//! A REST JSON API managing books, authors, genres, reviewers and reviews.
//! Clients refer to authors, genres and reviewers by name; the server resolves
//! those names to stored records and keeps the book associations consistent.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod seed;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repository::{Repository, SharedStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    /// Set when the catalog is backed by Postgres; used by the readiness probe
    pub database: Option<Repository>,
}

impl AppState {
    pub fn new(config: AppConfig, store: SharedStore, database: Option<Repository>) -> Self {
        Self {
            config: Arc::new(config),
            services: Arc::new(services::Services::new(store)),
            database,
        }
    }
}
