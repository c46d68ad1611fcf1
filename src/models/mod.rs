//! Data models for the Bookshelf catalog

pub mod author;
pub mod book;
pub mod genre;
pub mod link;
pub mod name;
pub mod patch;
pub mod review;
pub mod reviewer;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookDto, NewBook};
pub use genre::Genre;
pub use link::{BookLink, LinkKind};
pub use name::{normalize, PersonName};
pub use patch::Patch;
pub use review::{NewReview, Review, ReviewDto};
pub use reviewer::Reviewer;
