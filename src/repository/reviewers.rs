//! Reviewers table on Postgres

use async_trait::async_trait;

use super::{Repository, ReviewerStore};
use crate::{
    error::{AppError, AppResult},
    models::{PersonName, Review, Reviewer},
};

#[async_trait]
impl ReviewerStore for Repository {
    async fn list_reviewers(&self) -> AppResult<Vec<Reviewer>> {
        let rows = sqlx::query_as::<_, Reviewer>(
            "SELECT id, first_name, last_name FROM reviewers ORDER BY last_name, first_name, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_reviewer(&self, id: i32) -> AppResult<Option<Reviewer>> {
        let row = sqlx::query_as::<_, Reviewer>(
            "SELECT id, first_name, last_name FROM reviewers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn reviewer_exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM reviewers WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn find_reviewer_by_name(&self, name: &PersonName) -> AppResult<Option<Reviewer>> {
        let row = sqlx::query_as::<_, Reviewer>(
            r#"
            SELECT id, first_name, last_name FROM reviewers
            WHERE lower(btrim(first_name)) = lower(btrim($1))
              AND lower(btrim(last_name)) = lower(btrim($2))
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(&name.first_name)
        .bind(&name.last_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_reviewer(&self, name: &PersonName) -> AppResult<Reviewer> {
        sqlx::query_as::<_, Reviewer>(
            "INSERT INTO reviewers (first_name, last_name) VALUES ($1, $2) RETURNING id, first_name, last_name",
        )
        .bind(&name.first_name)
        .bind(&name.last_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, "Reviewer already exists"))
    }

    async fn update_reviewer(&self, reviewer: &Reviewer) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE reviewers SET first_name = $1, last_name = $2 WHERE id = $3")
                .bind(&reviewer.first_name)
                .bind(&reviewer.last_name)
                .bind(reviewer.id)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::from_write(e, "Reviewer already exists"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_reviewer(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM reviewers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_write(e, "Reviewer still has reviews"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_reviews_by_reviewer(&self, reviewer_id: i32) -> AppResult<Vec<Review>> {
        let rows = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, book_title, review_text, book_id, reviewer_id
            FROM reviews WHERE reviewer_id = $1
            ORDER BY id
            "#,
        )
        .bind(reviewer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
