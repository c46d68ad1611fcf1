//! Books table on Postgres

use async_trait::async_trait;

use super::{links::write_links, BookStore, Repository};
use crate::{
    error::{AppError, AppResult},
    models::{Book, LinkKind, NewBook},
};

const DUPLICATE_BOOK: &str = "A book with this title and publication year already exists";

#[async_trait]
impl BookStore for Repository {
    async fn list_books(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            "SELECT id, title, publication_year FROM books ORDER BY title, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_book(&self, id: i32) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>(
            "SELECT id, title, publication_year FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn book_exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn get_book_by_title(&self, title: &str) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, publication_year FROM books
            WHERE lower(btrim(title)) = lower(btrim($1))
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn book_duplicate_exists(
        &self,
        title: &str,
        publication_year: i32,
        exclude_id: Option<i32>,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM books
                WHERE lower(btrim(title)) = lower(btrim($1))
                  AND publication_year = $2
                  AND ($3::int IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(title)
        .bind(publication_year)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert_book(&self, book: &NewBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            "INSERT INTO books (title, publication_year) VALUES ($1, $2) RETURNING id, title, publication_year",
        )
        .bind(&book.title)
        .bind(book.publication_year)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, DUPLICATE_BOOK))
    }

    async fn update_book(&self, book: &Book) -> AppResult<bool> {
        let result = sqlx::query("UPDATE books SET title = $1, publication_year = $2 WHERE id = $3")
            .bind(&book.title)
            .bind(book.publication_year)
            .bind(book.id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_write(e, DUPLICATE_BOOK))?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_book_with_links(
        &self,
        book: &NewBook,
        author_id: i32,
        genre_id: i32,
    ) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Book>(
            "INSERT INTO books (title, publication_year) VALUES ($1, $2) RETURNING id, title, publication_year",
        )
        .bind(&book.title)
        .bind(book.publication_year)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_write(e, DUPLICATE_BOOK))?;

        write_links(&mut *tx, LinkKind::Author, created.id, &[author_id]).await?;
        write_links(&mut *tx, LinkKind::Genre, created.id, &[genre_id]).await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn update_book_with_links(
        &self,
        book: &Book,
        author_id: Option<i32>,
        genre_id: Option<i32>,
    ) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE books SET title = $1, publication_year = $2 WHERE id = $3")
            .bind(&book.title)
            .bind(book.publication_year)
            .bind(book.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_write(e, DUPLICATE_BOOK))?;
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        if let Some(author_id) = author_id {
            write_links(&mut *tx, LinkKind::Author, book.id, &[author_id]).await?;
        }
        if let Some(genre_id) = genre_id {
            write_links(&mut *tx, LinkKind::Genre, book.id, &[genre_id]).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn delete_book(&self, id: i32) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM reviews WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM book_authors WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        // Nothing removed: leave reviews and links as they were
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }
}
