//! Reviewer model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{name::PersonName, review::ReviewDto};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reviewer {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

impl Reviewer {
    pub fn name(&self) -> PersonName {
        PersonName::new(self.first_name.clone(), self.last_name.clone())
    }
}

/// Reviewer with the reviews they wrote
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewerDetails {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub reviews: Vec<ReviewDto>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReviewer {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
}

pub type UpdateReviewer = CreateReviewer;

impl From<&CreateReviewer> for PersonName {
    fn from(data: &CreateReviewer) -> Self {
        PersonName::new(data.first_name.clone(), data.last_name.clone())
    }
}
