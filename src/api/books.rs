//! Book API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::book::{BookDto, CreateBook, PatchBook, UpdateBook},
};

use super::extract::ValidJson;

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "Books ordered by title", body = Vec<BookDto>)
    )
)]
pub async fn list_books(State(state): State<crate::AppState>) -> AppResult<Json<Vec<BookDto>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(Json(books))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book with its author and genre", body = BookDto),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDto>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Create a book. The author and the genre are found by name or created.
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = BookDto),
        (status = 400, description = "Missing or blank field"),
        (status = 422, description = "Same title and year already exists")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    ValidJson(data): ValidJson<CreateBook>,
) -> AppResult<(StatusCode, Json<BookDto>)> {
    let book = state.services.catalog.create_book(data).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Replace a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = BookDto),
        (status = 400, description = "Invalid body or id mismatch"),
        (status = 404, description = "Book not found"),
        (status = 422, description = "Same title and year already exists")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    ValidJson(data): ValidJson<UpdateBook>,
) -> AppResult<Json<BookDto>> {
    let book = state.services.catalog.update_book(id, data).await?;
    Ok(Json(book))
}

/// Partially update a book
#[utoipa::path(
    patch,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = PatchBook,
    responses(
        (status = 200, description = "Book updated", body = BookDto),
        (status = 400, description = "Null field or incomplete author name"),
        (status = 404, description = "Book not found"),
        (status = 422, description = "Same title and year already exists")
    )
)]
pub async fn patch_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    ValidJson(patch): ValidJson<PatchBook>,
) -> AppResult<Json<BookDto>> {
    let book = state.services.catalog.patch_book(id, patch).await?;
    Ok(Json(book))
}

/// Delete a book with its reviews
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
