//! Authors table on Postgres

use async_trait::async_trait;

use super::{AuthorStore, Repository};
use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, PersonName},
};

#[async_trait]
impl AuthorStore for Repository {
    async fn list_authors(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(
            "SELECT id, first_name, last_name FROM authors ORDER BY last_name, first_name, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_author(&self, id: i32) -> AppResult<Option<Author>> {
        let row = sqlx::query_as::<_, Author>(
            "SELECT id, first_name, last_name FROM authors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn author_exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn find_author_by_name(&self, name: &PersonName) -> AppResult<Option<Author>> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            SELECT id, first_name, last_name FROM authors
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

    async fn insert_author(&self, name: &PersonName) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            "INSERT INTO authors (first_name, last_name) VALUES ($1, $2) RETURNING id, first_name, last_name",
        )
        .bind(&name.first_name)
        .bind(&name.last_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, "Author already exists"))
    }

    async fn update_author(&self, author: &Author) -> AppResult<bool> {
        let result = sqlx::query("UPDATE authors SET first_name = $1, last_name = $2 WHERE id = $3")
            .bind(&author.first_name)
            .bind(&author.last_name)
            .bind(author.id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_write(e, "Author already exists"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_author(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_write(e, "Author is still linked to books"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_books_by_author(&self, author_id: i32) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            r#"
            SELECT b.id, b.title, b.publication_year
            FROM books b
            JOIN book_authors ba ON ba.book_id = b.id
            WHERE ba.author_id = $1
            ORDER BY b.title, b.id
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
