//! Reviewers service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        reviewer::{CreateReviewer, ReviewerDetails, UpdateReviewer},
        PersonName, ReviewDto, Reviewer,
    },
    repository::{ReviewerStore, SharedStore},
};

#[derive(Clone)]
pub struct ReviewersService {
    store: SharedStore,
}

impl ReviewersService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// All reviewers ordered by last then first name
    pub async fn list_reviewers(&self) -> AppResult<Vec<Reviewer>> {
        self.store.list_reviewers().await
    }

    /// Reviewer with every review they wrote
    pub async fn get_reviewer(&self, id: i32) -> AppResult<ReviewerDetails> {
        let reviewer = self.find(id).await?;
        let reviews = self.reviews_by_reviewer(id).await?;
        Ok(ReviewerDetails {
            id: reviewer.id,
            first_name: reviewer.first_name,
            last_name: reviewer.last_name,
            reviews,
        })
    }

    pub async fn create_reviewer(&self, data: CreateReviewer) -> AppResult<Reviewer> {
        data.validate()?;
        let name = PersonName::from(&data).trimmed("Reviewer")?;

        if self.store.find_reviewer_by_name(&name).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Reviewer {} {} already exists",
                name.first_name, name.last_name
            )));
        }

        let reviewer = self.store.insert_reviewer(&name).await?;
        tracing::info!("Reviewers: created reviewer id={}", reviewer.id);
        Ok(reviewer)
    }

    pub async fn update_reviewer(&self, id: i32, data: UpdateReviewer) -> AppResult<Reviewer> {
        data.validate()?;
        let name = PersonName::from(&data).trimmed("Reviewer")?;
        let mut reviewer = self.find(id).await?;

        if let Some(existing) = self.store.find_reviewer_by_name(&name).await? {
            if existing.id != id {
                return Err(AppError::Conflict(format!(
                    "Reviewer {} {} already exists",
                    name.first_name, name.last_name
                )));
            }
        }

        reviewer.first_name = name.first_name;
        reviewer.last_name = name.last_name;
        if !self.store.update_reviewer(&reviewer).await? {
            return Err(AppError::save_failed("the reviewer"));
        }
        tracing::info!("Reviewers: updated reviewer id={}", id);
        Ok(reviewer)
    }

    /// Delete a reviewer without reviews
    pub async fn delete_reviewer(&self, id: i32) -> AppResult<()> {
        self.find(id).await?;
        if !self.store.list_reviews_by_reviewer(id).await?.is_empty() {
            return Err(AppError::Conflict(format!(
                "Reviewer {} still has reviews",
                id
            )));
        }
        if !self.store.delete_reviewer(id).await? {
            return Err(AppError::save_failed("the reviewer deletion"));
        }
        tracing::info!("Reviewers: deleted reviewer id={}", id);
        Ok(())
    }

    pub async fn reviews_by_reviewer(&self, id: i32) -> AppResult<Vec<ReviewDto>> {
        let reviewer = self.find(id).await?;
        Ok(self
            .store
            .list_reviews_by_reviewer(id)
            .await?
            .into_iter()
            .map(|review| ReviewDto::from_parts(review, Some(&reviewer)))
            .collect())
    }

    async fn find(&self, id: i32) -> AppResult<Reviewer> {
        self.store
            .get_reviewer(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reviewer {} not found", id)))
    }
}
