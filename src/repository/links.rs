//! Book-author and book-genre junction tables on Postgres

use async_trait::async_trait;
use sqlx::{PgConnection, Row};

use super::{LinkStore, Repository};
use crate::{
    error::{AppError, AppResult},
    models::{BookLink, LinkKind},
};

#[async_trait]
impl LinkStore for Repository {
    async fn list_book_links(&self, kind: LinkKind, book_id: i32) -> AppResult<Vec<BookLink>> {
        let query = format!(
            "SELECT {col} FROM {table} WHERE book_id = $1 ORDER BY {col}",
            col = kind.target_column(),
            table = kind.table(),
        );
        let rows = sqlx::query(&query).bind(book_id).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| -> AppResult<BookLink> {
                Ok(BookLink {
                    kind,
                    book_id,
                    target_id: row.try_get::<i32, _>(0)?,
                })
            })
            .collect()
    }

    async fn insert_book_link(&self, link: &BookLink) -> AppResult<bool> {
        let query = format!(
            "INSERT INTO {table} (book_id, {col}) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            table = link.kind.table(),
            col = link.kind.target_column(),
        );
        let result = sqlx::query(&query)
            .bind(link.book_id)
            .bind(link.target_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_write(e, "Linked entity no longer exists"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn replace_book_links(
        &self,
        kind: LinkKind,
        book_id: i32,
        target_ids: &[i32],
    ) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let inserted = write_links(&mut *tx, kind, book_id, target_ids).await?;
        if !target_ids.is_empty() && inserted == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }
}

/// Replace the links of `kind` for a book inside the caller's transaction.
/// Returns the number of links inserted.
pub(super) async fn write_links(
    conn: &mut PgConnection,
    kind: LinkKind,
    book_id: i32,
    target_ids: &[i32],
) -> AppResult<u64> {
    sqlx::query(&format!("DELETE FROM {} WHERE book_id = $1", kind.table()))
        .bind(book_id)
        .execute(&mut *conn)
        .await?;

    let insert = format!(
        "INSERT INTO {table} (book_id, {col}) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        table = kind.table(),
        col = kind.target_column(),
    );
    let mut inserted = 0;
    for target_id in target_ids {
        let result = sqlx::query(&insert)
            .bind(book_id)
            .bind(*target_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::from_write(e, "Linked entity no longer exists"))?;
        inserted += result.rows_affected();
    }
    Ok(inserted)
}
