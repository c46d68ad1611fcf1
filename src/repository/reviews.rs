//! Reviews table on Postgres

use async_trait::async_trait;

use super::{Repository, ReviewStore};
use crate::{
    error::{AppError, AppResult},
    models::{NewReview, Review},
};

#[async_trait]
impl ReviewStore for Repository {
    async fn list_reviews(&self) -> AppResult<Vec<Review>> {
        let rows = sqlx::query_as::<_, Review>(
            "SELECT id, book_title, review_text, book_id, reviewer_id FROM reviews ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_review(&self, id: i32) -> AppResult<Option<Review>> {
        let row = sqlx::query_as::<_, Review>(
            "SELECT id, book_title, review_text, book_id, reviewer_id FROM reviews WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn review_exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM reviews WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn insert_review(&self, review: &NewReview) -> AppResult<Review> {
        sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (book_title, review_text, book_id, reviewer_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, book_title, review_text, book_id, reviewer_id
            "#,
        )
        .bind(&review.book_title)
        .bind(&review.review_text)
        .bind(review.book_id)
        .bind(review.reviewer_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, "Referenced book or reviewer no longer exists"))
    }

    async fn update_review(&self, review: &Review) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE reviews
            SET book_title = $1, review_text = $2, book_id = $3, reviewer_id = $4
            WHERE id = $5
            "#,
        )
        .bind(&review.book_title)
        .bind(&review.review_text)
        .bind(review.book_id)
        .bind(review.reviewer_id)
        .bind(review.id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, "Referenced book or reviewer no longer exists"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_review(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_reviews_by_book(&self, book_id: i32) -> AppResult<Vec<Review>> {
        let rows = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, book_title, review_text, book_id, reviewer_id
            FROM reviews WHERE book_id = $1
            ORDER BY id
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
