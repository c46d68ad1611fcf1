//! Reviewer API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        reviewer::{CreateReviewer, Reviewer, ReviewerDetails, UpdateReviewer},
        ReviewDto,
    },
};

use super::extract::ValidJson;

/// List all reviewers
#[utoipa::path(
    get,
    path = "/reviewers",
    tag = "reviewers",
    responses(
        (status = 200, description = "Reviewers ordered by last then first name", body = Vec<Reviewer>)
    )
)]
pub async fn list_reviewers(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Reviewer>>> {
    let reviewers = state.services.reviewers.list_reviewers().await?;
    Ok(Json(reviewers))
}

/// Get reviewer with their reviews
#[utoipa::path(
    get,
    path = "/reviewers/{id}",
    tag = "reviewers",
    params(("id" = i32, Path, description = "Reviewer ID")),
    responses(
        (status = 200, description = "Reviewer details", body = ReviewerDetails),
        (status = 404, description = "Reviewer not found")
    )
)]
pub async fn get_reviewer(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ReviewerDetails>> {
    let reviewer = state.services.reviewers.get_reviewer(id).await?;
    Ok(Json(reviewer))
}

/// Create reviewer
#[utoipa::path(
    post,
    path = "/reviewers",
    tag = "reviewers",
    request_body = CreateReviewer,
    responses(
        (status = 201, description = "Reviewer created", body = Reviewer),
        (status = 422, description = "Reviewer already exists")
    )
)]
pub async fn create_reviewer(
    State(state): State<crate::AppState>,
    ValidJson(data): ValidJson<CreateReviewer>,
) -> AppResult<(StatusCode, Json<Reviewer>)> {
    let reviewer = state.services.reviewers.create_reviewer(data).await?;
    Ok((StatusCode::CREATED, Json(reviewer)))
}

/// Rename reviewer
#[utoipa::path(
    put,
    path = "/reviewers/{id}",
    tag = "reviewers",
    params(("id" = i32, Path, description = "Reviewer ID")),
    request_body = UpdateReviewer,
    responses(
        (status = 200, description = "Reviewer updated", body = Reviewer),
        (status = 404, description = "Reviewer not found"),
        (status = 422, description = "Name belongs to another reviewer")
    )
)]
pub async fn update_reviewer(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    ValidJson(data): ValidJson<UpdateReviewer>,
) -> AppResult<Json<Reviewer>> {
    let reviewer = state.services.reviewers.update_reviewer(id, data).await?;
    Ok(Json(reviewer))
}

/// Delete reviewer
#[utoipa::path(
    delete,
    path = "/reviewers/{id}",
    tag = "reviewers",
    params(("id" = i32, Path, description = "Reviewer ID")),
    responses(
        (status = 204, description = "Reviewer deleted"),
        (status = 404, description = "Reviewer not found"),
        (status = 422, description = "Reviewer still has reviews")
    )
)]
pub async fn delete_reviewer(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.reviewers.delete_reviewer(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the reviews written by a reviewer
#[utoipa::path(
    get,
    path = "/reviewers/{id}/reviews",
    tag = "reviewers",
    params(("id" = i32, Path, description = "Reviewer ID")),
    responses(
        (status = 200, description = "Reviews by the reviewer", body = Vec<ReviewDto>),
        (status = 404, description = "Reviewer not found")
    )
)]
pub async fn list_reviewer_reviews(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<ReviewDto>>> {
    let reviews = state.services.reviewers.reviews_by_reviewer(id).await?;
    Ok(Json(reviews))
}
