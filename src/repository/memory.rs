//! In-process books repository.
//!
//! Mirrors the PostgreSQL repository's ordering and matching rules: titles
//! sort case-insensitively (`LOWER(title)`), then by exact title, then by id.
//! Used by the test suite and when `database.in_memory` is set.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::BooksRepository;
use crate::{
    error::AppResult,
    models::book::{Book, NewBook},
};

#[derive(Default)]
struct Inner {
    books: BTreeMap<i32, Book>,
    last_id: i32,
}

#[derive(Default)]
pub struct MemoryBooksRepository {
    inner: RwLock<Inner>,
}

impl MemoryBooksRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn title_order(books: &mut [Book]) {
    books.sort_by_cached_key(|b| (b.title.to_lowercase(), b.title.clone(), b.id));
}

fn matches(book: &Book, needle: &str) -> bool {
    let contains = |value: &str| value.to_lowercase().contains(needle);

    contains(&book.title)
        || contains(&book.author)
        || book.genre.as_deref().is_some_and(contains)
        || book.year.is_some_and(|y| contains(&y.to_string()))
}

#[async_trait]
impl BooksRepository for MemoryBooksRepository {
    async fn list(&self, offset: i64, limit: i64) -> AppResult<Vec<Book>> {
        let inner = self.inner.read().await;
        let mut books: Vec<Book> = inner.books.values().cloned().collect();
        title_order(&mut books);

        Ok(books
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.inner.read().await.books.len() as i64)
    }

    async fn search(&self, term: &str) -> AppResult<Vec<Book>> {
        let needle = term.to_lowercase();
        let inner = self.inner.read().await;
        let mut books: Vec<Book> = inner
            .books
            .values()
            .filter(|b| matches(b, &needle))
            .cloned()
            .collect();
        title_order(&mut books);
        Ok(books)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        Ok(self.inner.read().await.books.get(&id).cloned())
    }

    async fn create(&self, book: &NewBook) -> AppResult<Book> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;

        let now = Utc::now();
        let created = Book {
            id: inner.last_id,
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            year: book.year,
            created_at: now,
            updated_at: now,
        };
        inner.books.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, book: &NewBook) -> AppResult<Option<Book>> {
        let mut inner = self.inner.write().await;
        let Some(existing) = inner.books.get_mut(&id) else {
            return Ok(None);
        };

        existing.title = book.title.clone();
        existing.author = book.author.clone();
        existing.genre = book.genre.clone();
        existing.year = book.year;
        existing.updated_at = Utc::now();
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        Ok(self.inner.write().await.books.remove(&id).is_some())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_book(title: &str, author: &str, genre: Option<&str>, year: Option<i32>) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: author.to_string(),
            genre: genre.map(str::to_string),
            year,
        }
    }

    #[tokio::test]
    async fn ids_are_never_reused() {
        let repo = MemoryBooksRepository::new();
        let first = repo.create(&new_book("A", "X", None, None)).await.unwrap();
        assert!(repo.delete(first.id).await.unwrap());
        let second = repo.create(&new_book("B", "Y", None, None)).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn search_covers_every_field() {
        let repo = MemoryBooksRepository::new();
        repo.create(&new_book("Dune", "Frank Herbert", Some("Science Fiction"), Some(1965)))
            .await
            .unwrap();
        repo.create(&new_book("Emma", "Jane Austen", Some("Romance"), Some(1815)))
            .await
            .unwrap();

        assert_eq!(repo.search("herb").await.unwrap().len(), 1);
        assert_eq!(repo.search("FICTION").await.unwrap().len(), 1);
        assert_eq!(repo.search("1815").await.unwrap()[0].title, "Emma");
        assert_eq!(repo.search("e").await.unwrap().len(), 2);
        assert!(repo.search("zzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn titles_sort_case_insensitively() {
        let repo = MemoryBooksRepository::new();
        for title in ["Cherry", "banana", "apple"] {
            repo.create(&new_book(title, "X", None, None)).await.unwrap();
        }

        let titles: Vec<_> = repo
            .list(0, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["apple", "banana", "Cherry"]);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_ids() {
        let repo = MemoryBooksRepository::new();
        let book = new_book("Ulysses", "James Joyce", None, None);
        assert_eq!(repo.update(99, &book).await.unwrap(), None);
        assert!(!repo.delete(99).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
