//! Review model and request bodies

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{patch::Patch, reviewer::Reviewer};

/// Review row. `book_title` is the book's title as it was when the review was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Review {
    pub id: i32,
    pub book_title: String,
    pub review_text: String,
    pub book_id: i32,
    pub reviewer_id: i32,
}

/// Review row before insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub book_title: String,
    pub review_text: String,
    pub book_id: i32,
    pub reviewer_id: i32,
}

/// Review as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReviewDto {
    pub id: i32,
    pub book_title: String,
    pub review_text: String,
    pub book_id: i32,
    pub reviewer_id: i32,
    pub reviewer_first_name: Option<String>,
    pub reviewer_last_name: Option<String>,
}

impl ReviewDto {
    pub fn from_parts(review: Review, reviewer: Option<&Reviewer>) -> Self {
        Self {
            id: review.id,
            book_title: review.book_title,
            review_text: review.review_text,
            book_id: review.book_id,
            reviewer_id: review.reviewer_id,
            reviewer_first_name: reviewer.map(|r| r.first_name.clone()),
            reviewer_last_name: reviewer.map(|r| r.last_name.clone()),
        }
    }
}

/// Create review request. The book is referenced by title, not by id.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReview {
    #[validate(length(min = 1, message = "Book title is required"))]
    pub book_title: String,
    #[validate(length(min = 1, message = "Review text is required"))]
    pub review_text: String,
    #[validate(length(min = 1, message = "Reviewer first name is required"))]
    pub reviewer_first_name: String,
    #[validate(length(min = 1, message = "Reviewer last name is required"))]
    pub reviewer_last_name: String,
}

/// Full update request; `id` must match the path
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateReview {
    pub id: i32,
    #[validate(length(min = 1, message = "Book title is required"))]
    pub book_title: String,
    #[validate(length(min = 1, message = "Review text is required"))]
    pub review_text: String,
    #[validate(length(min = 1, message = "Reviewer first name is required"))]
    pub reviewer_first_name: String,
    #[validate(length(min = 1, message = "Reviewer last name is required"))]
    pub reviewer_last_name: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PatchReview {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub review_text: Patch<String>,
    /// Re-targets the review at the book with this title
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub book_title: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub reviewer_first_name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub reviewer_last_name: Patch<String>,
}
