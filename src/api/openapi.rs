//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, genres, health, reviewers, reviews};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "1.0.0",
        description = "Book catalog REST API: books, authors, genres, reviewers and reviews",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::patch_book,
        books::delete_book,
        // Reviews
        reviews::list_reviews,
        reviews::get_review,
        reviews::list_reviews_by_book,
        reviews::create_review,
        reviews::update_review,
        reviews::patch_review,
        reviews::delete_review,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        authors::list_author_books,
        // Genres
        genres::list_genres,
        genres::get_genre,
        genres::create_genre,
        genres::update_genre,
        genres::delete_genre,
        genres::list_genre_books,
        // Reviewers
        reviewers::list_reviewers,
        reviewers::get_reviewer,
        reviewers::create_reviewer,
        reviewers::update_reviewer,
        reviewers::delete_reviewer,
        reviewers::list_reviewer_reviews,
    ),
    components(
        schemas(
            // Books
            crate::models::book::BookDto,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::PatchBook,
            // Reviews
            crate::models::review::ReviewDto,
            crate::models::review::CreateReview,
            crate::models::review::UpdateReview,
            crate::models::review::PatchReview,
            // Authors
            crate::models::author::Author,
            crate::models::author::CreateAuthor,
            // Genres
            crate::models::genre::Genre,
            crate::models::genre::CreateGenre,
            // Reviewers
            crate::models::reviewer::Reviewer,
            crate::models::reviewer::ReviewerDetails,
            crate::models::reviewer::CreateReviewer,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog"),
        (name = "reviews", description = "Book reviews"),
        (name = "authors", description = "Author management"),
        (name = "genres", description = "Genre management"),
        (name = "reviewers", description = "Reviewer management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/books",
            "/books/{id}",
            "/reviews/by-book/{book_id}",
            "/authors/{id}/books",
            "/genres/{id}/books",
            "/reviewers/{id}/reviews",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
