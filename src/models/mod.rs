//! Data models for Bookshelf

pub mod book;

// Re-export commonly used types
pub use book::{Book, BookDraft, BookForm, BookListing, BookQuery, FieldError, NewBook, PAGE_SIZE};
