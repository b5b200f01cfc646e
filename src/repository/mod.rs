//! Repository layer for catalog storage

pub mod books;
pub mod memory;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::book::{Book, NewBook},
};

pub use books::PgBooksRepository;
pub use memory::MemoryBooksRepository;

/// Storage operations on book records.
///
/// Listing and search results are ordered by title ascending, ignoring case
/// (exact title, then id, break ties).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BooksRepository: Send + Sync {
    /// One slice of the title-ordered catalog
    async fn list(&self, offset: i64, limit: i64) -> AppResult<Vec<Book>>;

    /// Total number of records
    async fn count(&self) -> AppResult<i64>;

    /// Case-insensitive substring match over title, author, genre and year
    async fn search(&self, term: &str) -> AppResult<Vec<Book>>;

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Book>>;

    async fn create(&self, book: &NewBook) -> AppResult<Book>;

    /// Returns `None` when no record has this id
    async fn update(&self, id: i32, book: &NewBook) -> AppResult<Option<Book>>;

    /// Returns `false` when no record has this id
    async fn delete(&self, id: i32) -> AppResult<bool>;

    /// Check that the store is reachable
    async fn ping(&self) -> AppResult<()>;
}

/// Escape LIKE wildcards so the term matches literally.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_wraps_and_escapes() {
        assert_eq!(like_pattern("gatsby"), "%gatsby%");
        assert_eq!(like_pattern("100%_"), "%100\\%\\_%");
    }
}
