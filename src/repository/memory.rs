//! In-memory store implementation.
//!
//! [`InMemoryRepository`] implements every store trait over process-local state.
//! It backs the `memory` storage backend and the test suites.
//!
//! ## Semantics
//!
//! - Natural keys are unique on their normalized form, as the Postgres indexes are
//! - References are checked like foreign keys (a dangling reference is a conflict)
//! - Each method takes the lock once, so compound operations are atomic
//!
//! Write failures can be injected with [`InMemoryRepository::fail_writes_after`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use super::{AuthorStore, BookStore, GenreStore, LinkStore, ReviewStore, ReviewerStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        name::same_key, Author, Book, BookLink, Genre, LinkKind, NewBook, NewReview, PersonName,
        Review, Reviewer,
    },
};

#[derive(Debug, Default)]
struct State {
    authors: BTreeMap<i32, Author>,
    genres: BTreeMap<i32, Genre>,
    books: BTreeMap<i32, Book>,
    reviewers: BTreeMap<i32, Reviewer>,
    reviews: BTreeMap<i32, Review>,
    /// (book_id, author_id)
    book_authors: BTreeSet<(i32, i32)>,
    /// (book_id, genre_id)
    book_genres: BTreeSet<(i32, i32)>,
    last_id: i32,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn links(&self, kind: LinkKind) -> &BTreeSet<(i32, i32)> {
        match kind {
            LinkKind::Author => &self.book_authors,
            LinkKind::Genre => &self.book_genres,
        }
    }

    fn links_mut(&mut self, kind: LinkKind) -> &mut BTreeSet<(i32, i32)> {
        match kind {
            LinkKind::Author => &mut self.book_authors,
            LinkKind::Genre => &mut self.book_genres,
        }
    }

    fn target_exists(&self, kind: LinkKind, target_id: i32) -> bool {
        match kind {
            LinkKind::Author => self.authors.contains_key(&target_id),
            LinkKind::Genre => self.genres.contains_key(&target_id),
        }
    }

    fn author_name_taken(&self, name: &PersonName, exclude_id: Option<i32>) -> bool {
        self.authors
            .values()
            .any(|a| Some(a.id) != exclude_id && name.matches(&a.first_name, &a.last_name))
    }

    fn genre_name_taken(&self, name: &str, exclude_id: Option<i32>) -> bool {
        self.genres
            .values()
            .any(|g| Some(g.id) != exclude_id && same_key(&g.name, name))
    }

    fn reviewer_name_taken(&self, name: &PersonName, exclude_id: Option<i32>) -> bool {
        self.reviewers
            .values()
            .any(|r| Some(r.id) != exclude_id && name.matches(&r.first_name, &r.last_name))
    }

    fn book_key_taken(&self, title: &str, year: i32, exclude_id: Option<i32>) -> bool {
        self.books.values().any(|b| {
            Some(b.id) != exclude_id && b.publication_year == year && same_key(&b.title, title)
        })
    }

    fn books_linked_to(&self, kind: LinkKind, target_id: i32) -> Vec<Book> {
        let mut books: Vec<Book> = self
            .links(kind)
            .iter()
            .filter(|(_, t)| *t == target_id)
            .filter_map(|(b, _)| self.books.get(b).cloned())
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        books
    }
}

/// Converts a lock poison error to a store error.
fn poison_err<T>(_: PoisonError<T>) -> AppError {
    AppError::Internal("store lock poisoned".to_string())
}

/// Thread-safe in-memory catalog store
#[derive(Debug)]
pub struct InMemoryRepository {
    state: RwLock<State>,
    /// Remaining successful writes before injected failures; negative means unlimited
    write_budget: AtomicI64,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
            write_budget: AtomicI64::new(-1),
        }
    }

    /// Let `n` more writes succeed, then fail every write until [`Self::reset_failures`].
    ///
    /// A failed insert returns [`AppError::Persistence`]; a failed update or delete
    /// returns `Ok(false)` (no row affected). Nothing is changed by a failed write.
    pub fn fail_writes_after(&self, n: usize) {
        self.write_budget.store(n as i64, Ordering::SeqCst);
    }

    pub fn reset_failures(&self) {
        self.write_budget.store(-1, Ordering::SeqCst);
    }

    /// Number of links of `kind` across all books
    pub fn link_count(&self, kind: LinkKind) -> AppResult<usize> {
        Ok(self.read()?.links(kind).len())
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, State>> {
        self.state.read().map_err(poison_err)
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, State>> {
        self.state.write().map_err(poison_err)
    }

    /// Consumes one unit of the write budget; false when the write must fail
    fn write_allowed(&self) -> bool {
        self.write_budget
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |budget| match budget {
                b if b < 0 => Some(b),
                0 => None,
                b => Some(b - 1),
            })
            .is_ok()
    }

    fn insert_failed(what: &str) -> AppError {
        AppError::Persistence(format!("store rejected insert of {}", what))
    }
}

#[async_trait]
impl AuthorStore for InMemoryRepository {
    async fn list_authors(&self) -> AppResult<Vec<Author>> {
        let state = self.read()?;
        let mut authors: Vec<Author> = state.authors.values().cloned().collect();
        authors.sort_by(|a, b| {
            (&a.last_name, &a.first_name, a.id).cmp(&(&b.last_name, &b.first_name, b.id))
        });
        Ok(authors)
    }

    async fn get_author(&self, id: i32) -> AppResult<Option<Author>> {
        Ok(self.read()?.authors.get(&id).cloned())
    }

    async fn author_exists(&self, id: i32) -> AppResult<bool> {
        Ok(self.read()?.authors.contains_key(&id))
    }

    async fn find_author_by_name(&self, name: &PersonName) -> AppResult<Option<Author>> {
        let state = self.read()?;
        Ok(state
            .authors
            .values()
            .find(|a| name.matches(&a.first_name, &a.last_name))
            .cloned())
    }

    async fn insert_author(&self, name: &PersonName) -> AppResult<Author> {
        let mut state = self.write()?;
        if state.author_name_taken(name, None) {
            return Err(AppError::Conflict("Author already exists".to_string()));
        }
        if !self.write_allowed() {
            return Err(Self::insert_failed("author"));
        }
        let author = Author {
            id: state.next_id(),
            first_name: name.first_name.clone(),
            last_name: name.last_name.clone(),
        };
        state.authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn update_author(&self, author: &Author) -> AppResult<bool> {
        let mut state = self.write()?;
        if !state.authors.contains_key(&author.id) {
            return Ok(false);
        }
        if state.author_name_taken(&author.name(), Some(author.id)) {
            return Err(AppError::Conflict("Author already exists".to_string()));
        }
        if !self.write_allowed() {
            return Ok(false);
        }
        state.authors.insert(author.id, author.clone());
        Ok(true)
    }

    async fn delete_author(&self, id: i32) -> AppResult<bool> {
        let mut state = self.write()?;
        if !state.authors.contains_key(&id) {
            return Ok(false);
        }
        if state.book_authors.iter().any(|(_, a)| *a == id) {
            return Err(AppError::Conflict("Author is still linked to books".to_string()));
        }
        if !self.write_allowed() {
            return Ok(false);
        }
        Ok(state.authors.remove(&id).is_some())
    }

    async fn list_books_by_author(&self, author_id: i32) -> AppResult<Vec<Book>> {
        Ok(self.read()?.books_linked_to(LinkKind::Author, author_id))
    }
}

#[async_trait]
impl GenreStore for InMemoryRepository {
    async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        let state = self.read()?;
        let mut genres: Vec<Genre> = state.genres.values().cloned().collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(genres)
    }

    async fn get_genre(&self, id: i32) -> AppResult<Option<Genre>> {
        Ok(self.read()?.genres.get(&id).cloned())
    }

    async fn genre_exists(&self, id: i32) -> AppResult<bool> {
        Ok(self.read()?.genres.contains_key(&id))
    }

    async fn find_genre_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        let state = self.read()?;
        Ok(state.genres.values().find(|g| same_key(&g.name, name)).cloned())
    }

    async fn insert_genre(&self, name: &str) -> AppResult<Genre> {
        let mut state = self.write()?;
        if state.genre_name_taken(name, None) {
            return Err(AppError::Conflict("Genre already exists".to_string()));
        }
        if !self.write_allowed() {
            return Err(Self::insert_failed("genre"));
        }
        let genre = Genre {
            id: state.next_id(),
            name: name.to_string(),
        };
        state.genres.insert(genre.id, genre.clone());
        Ok(genre)
    }

    async fn update_genre(&self, genre: &Genre) -> AppResult<bool> {
        let mut state = self.write()?;
        if !state.genres.contains_key(&genre.id) {
            return Ok(false);
        }
        if state.genre_name_taken(&genre.name, Some(genre.id)) {
            return Err(AppError::Conflict("Genre already exists".to_string()));
        }
        if !self.write_allowed() {
            return Ok(false);
        }
        state.genres.insert(genre.id, genre.clone());
        Ok(true)
    }

    async fn delete_genre(&self, id: i32) -> AppResult<bool> {
        let mut state = self.write()?;
        if !state.genres.contains_key(&id) || !self.write_allowed() {
            return Ok(false);
        }
        state.book_genres.retain(|(_, g)| *g != id);
        state.genres.remove(&id);
        Ok(true)
    }

    async fn list_books_by_genre(&self, genre_id: i32) -> AppResult<Vec<Book>> {
        Ok(self.read()?.books_linked_to(LinkKind::Genre, genre_id))
    }
}

#[async_trait]
impl BookStore for InMemoryRepository {
    async fn list_books(&self) -> AppResult<Vec<Book>> {
        let state = self.read()?;
        let mut books: Vec<Book> = state.books.values().cloned().collect();
        books.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(books)
    }

    async fn get_book(&self, id: i32) -> AppResult<Option<Book>> {
        Ok(self.read()?.books.get(&id).cloned())
    }

    async fn book_exists(&self, id: i32) -> AppResult<bool> {
        Ok(self.read()?.books.contains_key(&id))
    }

    async fn get_book_by_title(&self, title: &str) -> AppResult<Option<Book>> {
        let state = self.read()?;
        Ok(state.books.values().find(|b| same_key(&b.title, title)).cloned())
    }

    async fn book_duplicate_exists(
        &self,
        title: &str,
        publication_year: i32,
        exclude_id: Option<i32>,
    ) -> AppResult<bool> {
        Ok(self.read()?.book_key_taken(title, publication_year, exclude_id))
    }

    async fn insert_book(&self, book: &NewBook) -> AppResult<Book> {
        let mut state = self.write()?;
        if state.book_key_taken(&book.title, book.publication_year, None) {
            return Err(AppError::Conflict(
                "A book with this title and publication year already exists".to_string(),
            ));
        }
        if !self.write_allowed() {
            return Err(Self::insert_failed("book"));
        }
        let book = Book {
            id: state.next_id(),
            title: book.title.clone(),
            publication_year: book.publication_year,
        };
        state.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update_book(&self, book: &Book) -> AppResult<bool> {
        let mut state = self.write()?;
        if !state.books.contains_key(&book.id) {
            return Ok(false);
        }
        if state.book_key_taken(&book.title, book.publication_year, Some(book.id)) {
            return Err(AppError::Conflict(
                "A book with this title and publication year already exists".to_string(),
            ));
        }
        if !self.write_allowed() {
            return Ok(false);
        }
        state.books.insert(book.id, book.clone());
        Ok(true)
    }

    async fn insert_book_with_links(
        &self,
        book: &NewBook,
        author_id: i32,
        genre_id: i32,
    ) -> AppResult<Book> {
        let mut state = self.write()?;
        if state.book_key_taken(&book.title, book.publication_year, None) {
            return Err(AppError::Conflict(
                "A book with this title and publication year already exists".to_string(),
            ));
        }
        if !state.target_exists(LinkKind::Author, author_id)
            || !state.target_exists(LinkKind::Genre, genre_id)
        {
            return Err(AppError::Conflict("Linked entity no longer exists".to_string()));
        }
        if !self.write_allowed() {
            return Err(Self::insert_failed("book"));
        }
        let book = Book {
            id: state.next_id(),
            title: book.title.clone(),
            publication_year: book.publication_year,
        };
        state.books.insert(book.id, book.clone());
        state.book_authors.insert((book.id, author_id));
        state.book_genres.insert((book.id, genre_id));
        Ok(book)
    }

    async fn update_book_with_links(
        &self,
        book: &Book,
        author_id: Option<i32>,
        genre_id: Option<i32>,
    ) -> AppResult<bool> {
        let mut state = self.write()?;
        if !state.books.contains_key(&book.id) {
            return Ok(false);
        }
        if state.book_key_taken(&book.title, book.publication_year, Some(book.id)) {
            return Err(AppError::Conflict(
                "A book with this title and publication year already exists".to_string(),
            ));
        }
        let replacements = [(LinkKind::Author, author_id), (LinkKind::Genre, genre_id)];
        if replacements
            .iter()
            .any(|(kind, target)| matches!(target, Some(t) if !state.target_exists(*kind, *t)))
        {
            return Err(AppError::Conflict("Linked entity no longer exists".to_string()));
        }
        if !self.write_allowed() {
            return Ok(false);
        }
        state.books.insert(book.id, book.clone());
        for (kind, target) in replacements {
            if let Some(target_id) = target {
                let links = state.links_mut(kind);
                links.retain(|(b, _)| *b != book.id);
                links.insert((book.id, target_id));
            }
        }
        Ok(true)
    }

    async fn delete_book(&self, id: i32) -> AppResult<bool> {
        let mut state = self.write()?;
        if !state.books.contains_key(&id) || !self.write_allowed() {
            return Ok(false);
        }
        state.reviews.retain(|_, r| r.book_id != id);
        state.book_authors.retain(|(b, _)| *b != id);
        state.book_genres.retain(|(b, _)| *b != id);
        state.books.remove(&id);
        Ok(true)
    }
}

#[async_trait]
impl ReviewerStore for InMemoryRepository {
    async fn list_reviewers(&self) -> AppResult<Vec<Reviewer>> {
        let state = self.read()?;
        let mut reviewers: Vec<Reviewer> = state.reviewers.values().cloned().collect();
        reviewers.sort_by(|a, b| {
            (&a.last_name, &a.first_name, a.id).cmp(&(&b.last_name, &b.first_name, b.id))
        });
        Ok(reviewers)
    }

    async fn get_reviewer(&self, id: i32) -> AppResult<Option<Reviewer>> {
        Ok(self.read()?.reviewers.get(&id).cloned())
    }

    async fn reviewer_exists(&self, id: i32) -> AppResult<bool> {
        Ok(self.read()?.reviewers.contains_key(&id))
    }

    async fn find_reviewer_by_name(&self, name: &PersonName) -> AppResult<Option<Reviewer>> {
        let state = self.read()?;
        Ok(state
            .reviewers
            .values()
            .find(|r| name.matches(&r.first_name, &r.last_name))
            .cloned())
    }

    async fn insert_reviewer(&self, name: &PersonName) -> AppResult<Reviewer> {
        let mut state = self.write()?;
        if state.reviewer_name_taken(name, None) {
            return Err(AppError::Conflict("Reviewer already exists".to_string()));
        }
        if !self.write_allowed() {
            return Err(Self::insert_failed("reviewer"));
        }
        let reviewer = Reviewer {
            id: state.next_id(),
            first_name: name.first_name.clone(),
            last_name: name.last_name.clone(),
        };
        state.reviewers.insert(reviewer.id, reviewer.clone());
        Ok(reviewer)
    }

    async fn update_reviewer(&self, reviewer: &Reviewer) -> AppResult<bool> {
        let mut state = self.write()?;
        if !state.reviewers.contains_key(&reviewer.id) {
            return Ok(false);
        }
        if state.reviewer_name_taken(&reviewer.name(), Some(reviewer.id)) {
            return Err(AppError::Conflict("Reviewer already exists".to_string()));
        }
        if !self.write_allowed() {
            return Ok(false);
        }
        state.reviewers.insert(reviewer.id, reviewer.clone());
        Ok(true)
    }

    async fn delete_reviewer(&self, id: i32) -> AppResult<bool> {
        let mut state = self.write()?;
        if !state.reviewers.contains_key(&id) {
            return Ok(false);
        }
        if state.reviews.values().any(|r| r.reviewer_id == id) {
            return Err(AppError::Conflict("Reviewer still has reviews".to_string()));
        }
        if !self.write_allowed() {
            return Ok(false);
        }
        Ok(state.reviewers.remove(&id).is_some())
    }

    async fn list_reviews_by_reviewer(&self, reviewer_id: i32) -> AppResult<Vec<Review>> {
        let state = self.read()?;
        Ok(state
            .reviews
            .values()
            .filter(|r| r.reviewer_id == reviewer_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReviewStore for InMemoryRepository {
    async fn list_reviews(&self) -> AppResult<Vec<Review>> {
        Ok(self.read()?.reviews.values().cloned().collect())
    }

    async fn get_review(&self, id: i32) -> AppResult<Option<Review>> {
        Ok(self.read()?.reviews.get(&id).cloned())
    }

    async fn review_exists(&self, id: i32) -> AppResult<bool> {
        Ok(self.read()?.reviews.contains_key(&id))
    }

    async fn insert_review(&self, review: &NewReview) -> AppResult<Review> {
        let mut state = self.write()?;
        if !state.books.contains_key(&review.book_id)
            || !state.reviewers.contains_key(&review.reviewer_id)
        {
            return Err(AppError::Conflict(
                "Referenced book or reviewer no longer exists".to_string(),
            ));
        }
        if !self.write_allowed() {
            return Err(Self::insert_failed("review"));
        }
        let review = Review {
            id: state.next_id(),
            book_title: review.book_title.clone(),
            review_text: review.review_text.clone(),
            book_id: review.book_id,
            reviewer_id: review.reviewer_id,
        };
        state.reviews.insert(review.id, review.clone());
        Ok(review)
    }

    async fn update_review(&self, review: &Review) -> AppResult<bool> {
        let mut state = self.write()?;
        if !state.reviews.contains_key(&review.id) {
            return Ok(false);
        }
        if !state.books.contains_key(&review.book_id)
            || !state.reviewers.contains_key(&review.reviewer_id)
        {
            return Err(AppError::Conflict(
                "Referenced book or reviewer no longer exists".to_string(),
            ));
        }
        if !self.write_allowed() {
            return Ok(false);
        }
        state.reviews.insert(review.id, review.clone());
        Ok(true)
    }

    async fn delete_review(&self, id: i32) -> AppResult<bool> {
        let mut state = self.write()?;
        if !state.reviews.contains_key(&id) || !self.write_allowed() {
            return Ok(false);
        }
        Ok(state.reviews.remove(&id).is_some())
    }

    async fn list_reviews_by_book(&self, book_id: i32) -> AppResult<Vec<Review>> {
        let state = self.read()?;
        Ok(state
            .reviews
            .values()
            .filter(|r| r.book_id == book_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LinkStore for InMemoryRepository {
    async fn list_book_links(&self, kind: LinkKind, book_id: i32) -> AppResult<Vec<BookLink>> {
        let state = self.read()?;
        Ok(state
            .links(kind)
            .iter()
            .filter(|(b, _)| *b == book_id)
            .map(|(b, t)| BookLink {
                kind,
                book_id: *b,
                target_id: *t,
            })
            .collect())
    }

    async fn insert_book_link(&self, link: &BookLink) -> AppResult<bool> {
        let mut state = self.write()?;
        if !state.books.contains_key(&link.book_id) || !state.target_exists(link.kind, link.target_id)
        {
            return Err(AppError::Conflict("Linked entity no longer exists".to_string()));
        }
        if !self.write_allowed() {
            return Ok(false);
        }
        Ok(state
            .links_mut(link.kind)
            .insert((link.book_id, link.target_id)))
    }

    async fn replace_book_links(
        &self,
        kind: LinkKind,
        book_id: i32,
        target_ids: &[i32],
    ) -> AppResult<bool> {
        let mut state = self.write()?;
        if !state.books.contains_key(&book_id)
            || target_ids.iter().any(|t| !state.target_exists(kind, *t))
        {
            return Err(AppError::Conflict("Linked entity no longer exists".to_string()));
        }
        if !self.write_allowed() {
            return Ok(false);
        }
        let links = state.links_mut(kind);
        links.retain(|(b, _)| *b != book_id);
        links.extend(target_ids.iter().map(|t| (book_id, *t)));
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_author_names_are_unique_after_normalization() {
        let store = InMemoryRepository::new();
        store
            .insert_author(&PersonName::new("Frank", "Herbert"))
            .await
            .unwrap();
        let err = store
            .insert_author(&PersonName::new(" frank", "HERBERT "))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_book_cascades_in_one_step() {
        let store = InMemoryRepository::new();
        let author = store.insert_author(&PersonName::new("A", "B")).await.unwrap();
        let genre = store.insert_genre("Fantasy").await.unwrap();
        let reviewer = store.insert_reviewer(&PersonName::new("C", "D")).await.unwrap();
        let book = store
            .insert_book(&NewBook {
                title: "T".into(),
                publication_year: 2000,
            })
            .await
            .unwrap();
        store
            .replace_book_links(LinkKind::Author, book.id, &[author.id])
            .await
            .unwrap();
        store
            .replace_book_links(LinkKind::Genre, book.id, &[genre.id])
            .await
            .unwrap();
        store
            .insert_review(&NewReview {
                book_title: "T".into(),
                review_text: "ok".into(),
                book_id: book.id,
                reviewer_id: reviewer.id,
            })
            .await
            .unwrap();

        assert!(store.delete_book(book.id).await.unwrap());
        assert!(store.list_reviews().await.unwrap().is_empty());
        assert_eq!(store.link_count(LinkKind::Author).unwrap(), 0);
        assert_eq!(store.link_count(LinkKind::Genre).unwrap(), 0);
        assert!(store.author_exists(author.id).await.unwrap());
        assert!(!store.delete_book(book.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_injected_failures_leave_state_untouched() {
        let store = InMemoryRepository::new();
        let author = store.insert_author(&PersonName::new("A", "B")).await.unwrap();
        let other = store.insert_author(&PersonName::new("E", "F")).await.unwrap();
        let book = store
            .insert_book(&NewBook {
                title: "T".into(),
                publication_year: 2000,
            })
            .await
            .unwrap();
        store
            .replace_book_links(LinkKind::Author, book.id, &[author.id])
            .await
            .unwrap();

        store.fail_writes_after(0);
        assert!(!store
            .replace_book_links(LinkKind::Author, book.id, &[other.id])
            .await
            .unwrap());
        assert!(matches!(
            store.insert_genre("Horror").await,
            Err(AppError::Persistence(_))
        ));

        store.reset_failures();
        let links = store.list_book_links(LinkKind::Author, book.id).await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target_id, author.id);
    }

    #[tokio::test]
    async fn test_book_with_links_is_written_as_one_unit() {
        let store = InMemoryRepository::new();
        let author = store.insert_author(&PersonName::new("A", "B")).await.unwrap();
        let genre = store.insert_genre("Fantasy").await.unwrap();
        let new_book = NewBook {
            title: "T".into(),
            publication_year: 2000,
        };

        store.fail_writes_after(0);
        assert!(matches!(
            store.insert_book_with_links(&new_book, author.id, genre.id).await,
            Err(AppError::Persistence(_))
        ));
        store.reset_failures();
        assert!(store.list_books().await.unwrap().is_empty());
        assert_eq!(store.link_count(LinkKind::Author).unwrap(), 0);

        let book = store
            .insert_book_with_links(&new_book, author.id, genre.id)
            .await
            .unwrap();
        let other = store.insert_genre("Horror").await.unwrap();

        store.fail_writes_after(0);
        let renamed = Book {
            title: "U".into(),
            ..book.clone()
        };
        assert!(!store
            .update_book_with_links(&renamed, None, Some(other.id))
            .await
            .unwrap());
        store.reset_failures();

        assert_eq!(store.get_book(book.id).await.unwrap(), Some(book.clone()));
        let genres = store.list_book_links(LinkKind::Genre, book.id).await.unwrap();
        assert_eq!(genres.len(), 1);
        assert_eq!(genres[0].target_id, genre.id);
    }

    #[tokio::test]
    async fn test_delete_genre_removes_only_its_links() {
        let store = InMemoryRepository::new();
        let genre = store.insert_genre("Horror").await.unwrap();
        let book = store
            .insert_book(&NewBook {
                title: "It".into(),
                publication_year: 1986,
            })
            .await
            .unwrap();
        store
            .insert_book_link(&BookLink {
                kind: LinkKind::Genre,
                book_id: book.id,
                target_id: genre.id,
            })
            .await
            .unwrap();

        assert!(store.delete_genre(genre.id).await.unwrap());
        assert!(store.book_exists(book.id).await.unwrap());
        assert!(store
            .list_book_links(LinkKind::Genre, book.id)
            .await
            .unwrap()
            .is_empty());
    }
}
