//! Review operations.
//!
//! Clients reference the reviewed book by title and the reviewer by name. The
//! title is looked up on its normalized form; the reviewer is resolved or
//! created. A review stores the book's title as it read at write time.

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        name::require_text,
        review::{CreateReview, PatchReview, UpdateReview},
        Book, NewReview, PersonName, Review, ReviewDto,
    },
    repository::{BookStore, ReviewStore, ReviewerStore, SharedStore},
};

use super::resolver::IdentityResolver;

#[derive(Clone)]
pub struct ReviewsService {
    store: SharedStore,
    resolver: IdentityResolver,
}

impl ReviewsService {
    pub fn new(store: SharedStore) -> Self {
        Self {
            resolver: IdentityResolver::new(store.clone()),
            store,
        }
    }

    pub async fn list_reviews(&self) -> AppResult<Vec<ReviewDto>> {
        let reviews = self.store.list_reviews().await?;
        self.to_dtos(reviews).await
    }

    pub async fn get_review(&self, id: i32) -> AppResult<ReviewDto> {
        let review = self
            .store
            .get_review(id)
            .await?
            .ok_or_else(|| review_not_found(id))?;
        self.to_dto(review).await
    }

    /// Reviews of one book; the book must exist
    pub async fn list_by_book(&self, book_id: i32) -> AppResult<Vec<ReviewDto>> {
        if !self.store.book_exists(book_id).await? {
            return Err(AppError::NotFound(format!("Book {} not found", book_id)));
        }
        let reviews = self.store.list_reviews_by_book(book_id).await?;
        self.to_dtos(reviews).await
    }

    pub async fn create_review(&self, data: CreateReview) -> AppResult<ReviewDto> {
        data.validate()?;
        let review_text = require_text("Review text", &data.review_text)?;
        let reviewer_name = PersonName::new(data.reviewer_first_name, data.reviewer_last_name)
            .trimmed("Reviewer")?;

        let book = self.book_by_title(&data.book_title).await?;
        let reviewer = self.resolver.resolve_reviewer(&reviewer_name).await?;

        let review = self
            .store
            .insert_review(&NewReview {
                book_title: book.title,
                review_text,
                book_id: book.id,
                reviewer_id: reviewer.id,
            })
            .await?;

        tracing::info!(
            "Reviews: created review id={} book_id={} reviewer_id={}",
            review.id,
            review.book_id,
            review.reviewer_id
        );
        self.get_review(review.id).await
    }

    pub async fn update_review(&self, id: i32, data: UpdateReview) -> AppResult<ReviewDto> {
        if id != data.id {
            return Err(AppError::Validation(format!(
                "Review id {} in path does not match id {} in body",
                id, data.id
            )));
        }
        data.validate()?;
        let review_text = require_text("Review text", &data.review_text)?;
        let reviewer_name = PersonName::new(data.reviewer_first_name, data.reviewer_last_name)
            .trimmed("Reviewer")?;

        let mut review = self
            .store
            .get_review(id)
            .await?
            .ok_or_else(|| review_not_found(id))?;
        let book = self.book_by_title(&data.book_title).await?;
        let reviewer = self.resolver.resolve_reviewer(&reviewer_name).await?;

        review.book_title = book.title;
        review.book_id = book.id;
        review.review_text = review_text;
        review.reviewer_id = reviewer.id;
        self.save(&review).await?;

        tracing::info!("Reviews: updated review id={}", id);
        self.get_review(id).await
    }

    /// Change only the supplied fields; the reviewer needs both names
    pub async fn patch_review(&self, id: i32, patch: PatchReview) -> AppResult<ReviewDto> {
        let review_text = patch
            .review_text
            .into_option("Review text")?
            .map(|t| require_text("Review text", &t))
            .transpose()?;
        let book_title = patch.book_title.into_option("Book title")?;
        let reviewer_name = PersonName::from_pair(
            "Reviewer",
            patch.reviewer_first_name.into_option("Reviewer first name")?,
            patch.reviewer_last_name.into_option("Reviewer last name")?,
        )?
        .map(|name| name.trimmed("Reviewer"))
        .transpose()?;

        let mut review = self
            .store
            .get_review(id)
            .await?
            .ok_or_else(|| review_not_found(id))?;

        if let Some(text) = review_text {
            review.review_text = text;
        }
        if let Some(title) = book_title {
            let book = self.book_by_title(&title).await?;
            review.book_title = book.title;
            review.book_id = book.id;
        }
        if let Some(name) = reviewer_name {
            review.reviewer_id = self.resolver.resolve_reviewer(&name).await?.id;
        }
        self.save(&review).await?;

        tracing::info!("Reviews: patched review id={}", id);
        self.get_review(id).await
    }

    pub async fn delete_review(&self, id: i32) -> AppResult<()> {
        if !self.store.review_exists(id).await? {
            return Err(review_not_found(id));
        }
        if !self.store.delete_review(id).await? {
            return Err(AppError::save_failed("the review deletion"));
        }
        tracing::info!("Reviews: deleted review id={}", id);
        Ok(())
    }

    /// Stored book whose normalized title matches; lowest id wins
    async fn book_by_title(&self, title: &str) -> AppResult<Book> {
        let title = require_text("Book title", title)?;
        self.store
            .get_book_by_title(&title)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No book titled '{}'", title)))
    }

    async fn save(&self, review: &Review) -> AppResult<()> {
        if !self.store.update_review(review).await? {
            return Err(AppError::save_failed("the review"));
        }
        Ok(())
    }

    pub(crate) async fn to_dto(&self, review: Review) -> AppResult<ReviewDto> {
        let reviewer = self.store.get_reviewer(review.reviewer_id).await?;
        Ok(ReviewDto::from_parts(review, reviewer.as_ref()))
    }

    pub(crate) async fn to_dtos(&self, reviews: Vec<Review>) -> AppResult<Vec<ReviewDto>> {
        let mut dtos = Vec::with_capacity(reviews.len());
        for review in reviews {
            dtos.push(self.to_dto(review).await?);
        }
        Ok(dtos)
    }
}

fn review_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Review {} not found", id))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        models::{NewBook, Patch},
        repository::InMemoryRepository,
    };

    struct Fixture {
        store: Arc<InMemoryRepository>,
        service: ReviewsService,
        dune: Book,
        emma: Book,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryRepository::new());
        let service = ReviewsService::new(store.clone());
        let dune = store
            .insert_book(&NewBook {
                title: "Dune".into(),
                publication_year: 1965,
            })
            .await
            .unwrap();
        let emma = store
            .insert_book(&NewBook {
                title: "Emma".into(),
                publication_year: 1815,
            })
            .await
            .unwrap();
        Fixture {
            store,
            service,
            dune,
            emma,
        }
    }

    fn review_of(title: &str) -> CreateReview {
        CreateReview {
            book_title: title.to_string(),
            review_text: "A classic".to_string(),
            reviewer_first_name: "Teddy".to_string(),
            reviewer_last_name: "Smith".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_uses_stored_book_title() {
        let f = fixture().await;

        let review = f.service.create_review(review_of("  DUNE ")).await.unwrap();

        assert_eq!(review.book_id, f.dune.id);
        assert_eq!(review.book_title, "Dune");
        assert_eq!(review.reviewer_first_name.as_deref(), Some("Teddy"));
        assert_eq!(f.store.list_reviewers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_with_unknown_title_is_not_found() {
        let f = fixture().await;

        let err = f.service.create_review(review_of("Unknown")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        // Nothing was written, not even the reviewer
        assert!(f.store.list_reviewers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_reuses_existing_reviewer() {
        let f = fixture().await;
        let first = f.service.create_review(review_of("Dune")).await.unwrap();
        let mut data = review_of("Emma");
        data.reviewer_first_name = "teddy ".to_string();
        let second = f.service.create_review(data).await.unwrap();

        assert_eq!(first.reviewer_id, second.reviewer_id);
    }

    #[tokio::test]
    async fn test_patch_text_only_keeps_references() {
        let f = fixture().await;
        let review = f.service.create_review(review_of("Dune")).await.unwrap();

        let patched = f
            .service
            .patch_review(
                review.id,
                PatchReview {
                    review_text: Patch::Value("Even better the second time".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(patched.review_text, "Even better the second time");
        assert_eq!(patched.book_id, review.book_id);
        assert_eq!(patched.reviewer_id, review.reviewer_id);
    }

    #[tokio::test]
    async fn test_patch_reviewer_needs_both_names() {
        let f = fixture().await;
        let review = f.service.create_review(review_of("Dune")).await.unwrap();

        let err = f
            .service
            .patch_review(
                review.id,
                PatchReview {
                    reviewer_first_name: Patch::Value("Taylor".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_patch_book_title_retargets_review() {
        let f = fixture().await;
        let review = f.service.create_review(review_of("Dune")).await.unwrap();

        let patched = f
            .service
            .patch_review(
                review.id,
                PatchReview {
                    book_title: Patch::Value("emma".to_string()),
                    reviewer_first_name: Patch::Value("Taylor".to_string()),
                    reviewer_last_name: Patch::Value("Jones".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(patched.book_id, f.emma.id);
        assert_eq!(patched.book_title, "Emma");
        assert_eq!(patched.reviewer_last_name.as_deref(), Some("Jones"));

        let err = f
            .service
            .patch_review(
                review.id,
                PatchReview {
                    book_title: Patch::Value("Unknown".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_checks_ids() {
        let f = fixture().await;
        let review = f.service.create_review(review_of("Dune")).await.unwrap();
        let body = |id| UpdateReview {
            id,
            book_title: "Emma".to_string(),
            review_text: "Charming".to_string(),
            reviewer_first_name: "Jessica".to_string(),
            reviewer_last_name: "McGregor".to_string(),
        };

        assert!(matches!(
            f.service.update_review(review.id, body(review.id + 1)).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            f.service.update_review(999, body(999)).await,
            Err(AppError::NotFound(_))
        ));

        let updated = f.service.update_review(review.id, body(review.id)).await.unwrap();
        assert_eq!(updated.book_id, f.emma.id);
        assert_eq!(updated.review_text, "Charming");
        assert_eq!(updated.reviewer_first_name.as_deref(), Some("Jessica"));
    }

    #[tokio::test]
    async fn test_list_by_book_and_delete() {
        let f = fixture().await;
        let review = f.service.create_review(review_of("Dune")).await.unwrap();
        f.service.create_review(review_of("Emma")).await.unwrap();

        let for_dune = f.service.list_by_book(f.dune.id).await.unwrap();
        assert_eq!(for_dune.len(), 1);
        assert!(matches!(
            f.service.list_by_book(999).await,
            Err(AppError::NotFound(_))
        ));

        f.service.delete_review(review.id).await.unwrap();
        assert!(f.service.list_by_book(f.dune.id).await.unwrap().is_empty());
        assert!(f.store.book_exists(f.dune.id).await.unwrap());
        assert!(matches!(
            f.service.delete_review(review.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
