//! Review API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::review::{CreateReview, PatchReview, ReviewDto, UpdateReview},
};

use super::extract::ValidJson;

/// List all reviews
#[utoipa::path(
    get,
    path = "/reviews",
    tag = "reviews",
    responses(
        (status = 200, description = "Review list", body = Vec<ReviewDto>)
    )
)]
pub async fn list_reviews(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<ReviewDto>>> {
    let reviews = state.services.reviews.list_reviews().await?;
    Ok(Json(reviews))
}

/// Get review by ID
#[utoipa::path(
    get,
    path = "/reviews/{id}",
    tag = "reviews",
    params(("id" = i32, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review details", body = ReviewDto),
        (status = 404, description = "Review not found")
    )
)]
pub async fn get_review(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ReviewDto>> {
    let review = state.services.reviews.get_review(id).await?;
    Ok(Json(review))
}

/// List the reviews of a book
#[utoipa::path(
    get,
    path = "/reviews/by-book/{book_id}",
    tag = "reviews",
    params(("book_id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Reviews of the book", body = Vec<ReviewDto>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_reviews_by_book(
    State(state): State<crate::AppState>,
    Path(book_id): Path<i32>,
) -> AppResult<Json<Vec<ReviewDto>>> {
    let reviews = state.services.reviews.list_by_book(book_id).await?;
    Ok(Json(reviews))
}

/// Create a review of the book with the given title
#[utoipa::path(
    post,
    path = "/reviews",
    tag = "reviews",
    request_body = CreateReview,
    responses(
        (status = 201, description = "Review created", body = ReviewDto),
        (status = 400, description = "Missing or blank field"),
        (status = 404, description = "No book with this title")
    )
)]
pub async fn create_review(
    State(state): State<crate::AppState>,
    ValidJson(data): ValidJson<CreateReview>,
) -> AppResult<(StatusCode, Json<ReviewDto>)> {
    let review = state.services.reviews.create_review(data).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// Replace a review
#[utoipa::path(
    put,
    path = "/reviews/{id}",
    tag = "reviews",
    params(("id" = i32, Path, description = "Review ID")),
    request_body = UpdateReview,
    responses(
        (status = 200, description = "Review updated", body = ReviewDto),
        (status = 400, description = "Invalid body or id mismatch"),
        (status = 404, description = "Review or book not found")
    )
)]
pub async fn update_review(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    ValidJson(data): ValidJson<UpdateReview>,
) -> AppResult<Json<ReviewDto>> {
    let review = state.services.reviews.update_review(id, data).await?;
    Ok(Json(review))
}

/// Partially update a review
#[utoipa::path(
    patch,
    path = "/reviews/{id}",
    tag = "reviews",
    params(("id" = i32, Path, description = "Review ID")),
    request_body = PatchReview,
    responses(
        (status = 200, description = "Review updated", body = ReviewDto),
        (status = 400, description = "Null field or incomplete reviewer name"),
        (status = 404, description = "Review or book not found")
    )
)]
pub async fn patch_review(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    ValidJson(patch): ValidJson<PatchReview>,
) -> AppResult<Json<ReviewDto>> {
    let review = state.services.reviews.patch_review(id, patch).await?;
    Ok(Json(review))
}

/// Delete a review
#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    tag = "reviews",
    params(("id" = i32, Path, description = "Review ID")),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn delete_review(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.reviews.delete_review(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
