//! Book (catalog record) model and form types.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

/// Number of records on one listing page
pub const PAGE_SIZE: i64 = 10;

/// Book record as stored
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields submitted by the new/edit book forms.
///
/// Every field arrives as a string; an absent field is an empty string.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct BookForm {
    #[serde(default)]
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    #[serde(default)]
    #[validate(custom(function = "validate_author"))]
    pub author: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    #[validate(custom(function = "validate_year"))]
    pub year: String,
}

/// Validated book values ready to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub year: Option<i32>,
}

impl TryFrom<BookForm> for NewBook {
    type Error = ValidationErrors;

    fn try_from(form: BookForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let year = match form.year.trim() {
            "" => None,
            // validate_year already rejected anything that does not parse
            year => year.parse().ok(),
        };

        Ok(NewBook {
            title: form.title.trim().to_string(),
            author: form.author.trim().to_string(),
            genre: non_empty(&form.genre),
            year,
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn required(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some(Cow::Borrowed(message));
        return Err(error);
    }
    Ok(())
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    required(title, "\"Title\" is required")
}

fn validate_author(author: &str) -> Result<(), ValidationError> {
    required(author, "\"Author\" is required")
}

fn validate_year(year: &str) -> Result<(), ValidationError> {
    let year = year.trim();
    if !year.is_empty() && year.parse::<i32>().is_err() {
        let mut error = ValidationError::new("integer");
        error.message = Some(Cow::Borrowed("\"Year\" must be a whole number"));
        return Err(error);
    }
    Ok(())
}

/// One validation failure, flattened for the view layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Flatten validator errors into form order (title, author, genre, year).
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut flat: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| FieldError {
                field: field.clone(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("\"{}\" is invalid", field)),
            })
        })
        .collect();

    flat.sort_by_key(|e| field_rank(&e.field));
    flat
}

fn field_rank(field: &str) -> usize {
    match field {
        "title" => 0,
        "author" => 1,
        "genre" => 2,
        "year" => 3,
        _ => 4,
    }
}

/// Editable representation of a book: a stored record, or the values of a
/// rejected update with the record id restored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookDraft {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: String,
}

impl BookDraft {
    pub fn from_form(id: i32, form: BookForm) -> Self {
        Self {
            id,
            title: form.title,
            author: form.author,
            genre: form.genre,
            year: form.year,
        }
    }
}

impl From<&Book> for BookDraft {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone().unwrap_or_default(),
            year: book.year.map(|y| y.to_string()).unwrap_or_default(),
        }
    }
}

/// Query string of the listing page.
///
/// Built from the raw query pairs; when a parameter repeats, the first value wins.
#[derive(Debug, Clone, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Page number (1-based, default: 1)
    pub page: Option<String>,
    /// Case-insensitive substring search across title, author, genre and year
    pub search: Option<String>,
}

impl FromIterator<(String, String)> for BookQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut query = BookQuery::default();
        for (key, value) in pairs {
            match key.as_str() {
                "page" if query.page.is_none() => query.page = Some(value),
                "search" if query.search.is_none() => query.search = Some(value),
                _ => {}
            }
        }
        query
    }
}

impl BookQuery {
    /// Requested page; anything missing, unparsable or below 1 is page 1.
    pub fn page_number(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }

    /// Trimmed search term, `None` when absent or blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Result of the listing operation
#[derive(Debug, Clone, Serialize)]
pub struct BookListing {
    pub books: Vec<Book>,
    /// Current page (always 1 for search results)
    pub page: i64,
    /// Total page count; 0 when searching
    pub pages: i64,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, author: &str, genre: &str, year: &str) -> BookForm {
        BookForm {
            title: title.to_string(),
            author: author.to_string(),
            genre: genre.to_string(),
            year: year.to_string(),
        }
    }

    #[test]
    fn valid_form_becomes_new_book() {
        let book = NewBook::try_from(form(" Emma ", "Jane Austen", "", "1815")).unwrap();
        assert_eq!(book.title, "Emma");
        assert_eq!(book.genre, None);
        assert_eq!(book.year, Some(1815));
    }

    #[test]
    fn empty_title_is_rejected() {
        let errors = NewBook::try_from(form("", "Jane Austen", "", "")).unwrap_err();
        let flat = field_errors(&errors);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].field, "title");
    }

    #[test]
    fn blank_fields_and_bad_year_are_reported_in_form_order() {
        let errors = NewBook::try_from(form("  ", "", "Novel", "eighteen")).unwrap_err();
        let fields: Vec<_> = field_errors(&errors).into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["title", "author", "year"]);
    }

    #[test]
    fn page_defaults_to_one() {
        let query = |page: Option<&str>| BookQuery {
            page: page.map(str::to_string),
            search: None,
        };
        assert_eq!(query(None).page_number(), 1);
        assert_eq!(query(Some("")).page_number(), 1);
        assert_eq!(query(Some("0")).page_number(), 1);
        assert_eq!(query(Some("-3")).page_number(), 1);
        assert_eq!(query(Some("abc")).page_number(), 1);
        assert_eq!(query(Some("4")).page_number(), 4);
    }

    #[test]
    fn repeated_parameters_keep_first_value() {
        let pairs = [
            ("search", "gatsby"),
            ("page", "2"),
            ("search", "moby"),
            ("page", "5"),
            ("sort", "x"),
        ];
        let query: BookQuery = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(query.search_term(), Some("gatsby"));
        assert_eq!(query.page_number(), 2);
    }

    #[test]
    fn blank_search_is_no_search() {
        let query = BookQuery {
            page: None,
            search: Some("   ".to_string()),
        };
        assert_eq!(query.search_term(), None);
    }

    #[test]
    fn draft_restores_id_and_keeps_attempted_values() {
        let draft = BookDraft::from_form(42, form("", "Tolstoy", "", "18x9"));
        assert_eq!(draft.id, 42);
        assert_eq!(draft.year, "18x9");
    }
}
