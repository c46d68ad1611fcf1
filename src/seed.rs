//! Sample catalog data for `bookshelf-server seeddata`.
//!
//! Records go through the regular services, so names are resolved and
//! associations created exactly as for API requests. A catalog that already
//! holds books is left untouched.

use crate::{
    error::AppResult,
    models::{book::CreateBook, review::CreateReview},
    services::Services,
};

struct SampleBook {
    title: &'static str,
    year: i32,
    author: (&'static str, &'static str),
    genre: &'static str,
    reviews: [&'static str; 3],
}

const REVIEWERS: [(&str, &str); 3] = [("Teddy", "Smith"), ("Taylor", "Jones"), ("Jessica", "McGregor")];

const SAMPLES: [SampleBook; 3] = [
    SampleBook {
        title: "Pikachu The Electric Mouse",
        year: 1996,
        author: ("Jack", "London"),
        genre: "Electric",
        reviews: [
            "Pickahu is the best pokemon, because it is electric",
            "Pickachu is the best a killing rocks",
            "Pickchu, pickachu, pikachu",
        ],
    },
    SampleBook {
        title: "Stranger",
        year: 1996,
        author: ("Harry", "Potter"),
        genre: "Romance",
        reviews: [
            "squirtle is the best pokemon, because it is electric",
            "Squirtle is the best a killing rocks",
            "squirtle, squirtle, squirtle",
        ],
    },
    SampleBook {
        title: "Venasuar",
        year: 1903,
        author: ("Ash", "Ketchum"),
        genre: "Leaf",
        reviews: [
            "Venasuar is the best pokemon, because it is electric",
            "Venasuar is the best a killing rocks",
            "Venasuar, Venasuar, Venasuar",
        ],
    },
];

/// What a seeding run created
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub books: usize,
    pub reviews: usize,
}

/// Populate an empty catalog with the sample books and their reviews
pub async fn seed_catalog(services: &Services) -> AppResult<SeedReport> {
    let mut report = SeedReport::default();

    if !services.catalog.list_books().await?.is_empty() {
        tracing::info!("Catalog already has books, skipping seed");
        return Ok(report);
    }

    for sample in &SAMPLES {
        let book = services
            .catalog
            .create_book(CreateBook {
                title: sample.title.to_string(),
                publication_year: sample.year,
                author_first_name: sample.author.0.to_string(),
                author_last_name: sample.author.1.to_string(),
                genre_name: sample.genre.to_string(),
            })
            .await?;
        report.books += 1;

        for (text, (first, last)) in sample.reviews.iter().zip(REVIEWERS) {
            services
                .reviews
                .create_review(CreateReview {
                    book_title: book.title.clone(),
                    review_text: text.to_string(),
                    reviewer_first_name: first.to_string(),
                    reviewer_last_name: last.to_string(),
                })
                .await?;
            report.reviews += 1;
        }
    }

    Ok(report)
}
