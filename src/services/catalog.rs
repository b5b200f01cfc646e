//! Catalog management service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookForm, BookListing, BookQuery, NewBook, PAGE_SIZE},
    repository::BooksRepository,
};

/// Number of pages needed for `total` records
pub fn page_count(total: i64, page_size: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (total + page_size - 1) / page_size
}

/// Offset of the first record of a 1-based page.
/// Pages far past the end saturate instead of overflowing.
pub fn page_offset(page: i64, page_size: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(page_size)
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Arc<dyn BooksRepository>,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn BooksRepository>) -> Self {
        Self { repository }
    }

    /// List one page of books, or every match when a search term is given.
    /// Search results are never paginated.
    pub async fn list_books(&self, query: &BookQuery) -> AppResult<BookListing> {
        if let Some(term) = query.search_term() {
            let books = self.repository.search(term).await?;
            tracing::debug!("Search '{}' matched {} book(s)", term, books.len());

            return Ok(BookListing {
                books,
                page: 1,
                pages: 0,
                search: Some(term.to_string()),
            });
        }

        let page = query.page_number();
        let books = self
            .repository
            .list(page_offset(page, PAGE_SIZE), PAGE_SIZE)
            .await?;
        let total = self.repository.count().await?;

        Ok(BookListing {
            books,
            page,
            pages: page_count(total, PAGE_SIZE),
            search: None,
        })
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Validate and store a new book
    pub async fn create_book(&self, form: BookForm) -> AppResult<Book> {
        let book = NewBook::try_from(form)?;
        let created = self.repository.create(&book).await?;
        tracing::info!("Created book id={} title={:?}", created.id, created.title);
        Ok(created)
    }

    /// Replace the fields of an existing book.
    /// A missing record is reported before the submitted fields are validated.
    pub async fn update_book(&self, id: i32, form: BookForm) -> AppResult<Book> {
        self.get_book(id).await?;

        let book = NewBook::try_from(form)?;
        let updated = self
            .repository
            .update(id, &book)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
        tracing::info!("Updated book id={}", id);
        Ok(updated)
    }

    /// Delete a book
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        if !self.repository.delete(id).await? {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        tracing::info!("Deleted book id={}", id);
        Ok(())
    }

    /// Check that the catalog store answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
