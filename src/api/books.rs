//! Book catalog pages

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use minijinja::context;

use crate::{
    error::{AppError, AppResult},
    models::book::{field_errors, BookDraft, BookForm, BookQuery},
    AppState,
};

const BOOKS_PATH: &str = "/books";

/// Path ids that are not integers cannot name a record.
fn parse_id(raw: &str) -> AppResult<i32> {
    raw.parse::<i32>()
        .map_err(|_| AppError::NotFound(format!("Book {} not found", raw)))
}

/// List books, one page at a time, or every search match
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Book listing page", content_type = "text/html", body = String),
        (status = 500, description = "Store failure")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Html<String>> {
    let query: BookQuery = pairs.into_iter().collect();
    let listing = state.services.catalog.list_books(&query).await?;

    state.templates.render(
        "books/index.html",
        context! {
            title => "Books",
            books => listing.books,
            page => listing.page,
            pages => listing.pages,
            search => listing.search,
        },
    )
}

/// Empty new-book form
#[utoipa::path(
    get,
    path = "/books/new",
    tag = "books",
    responses(
        (status = 200, description = "New book form", content_type = "text/html", body = String)
    )
)]
pub async fn new_book_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    state.templates.render(
        "books/new.html",
        context! { title => "New Book", book => context! {} },
    )
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books/new",
    tag = "books",
    request_body(content = BookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Book created, redirect to the listing"),
        (status = 200, description = "Form re-rendered with validation errors", content_type = "text/html", body = String),
        (status = 500, description = "Store failure")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    match state.services.catalog.create_book(form).await {
        Ok(_) => Ok(Redirect::to(BOOKS_PATH).into_response()),
        Err(AppError::Validation(errors)) => {
            let page = state.templates.render(
                "books/new.html",
                context! {
                    title => "New Book",
                    book => context! {},
                    errors => field_errors(&errors),
                },
            )?;
            Ok(page.into_response())
        }
        Err(e) => Err(e),
    }
}

/// Edit form for one book
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Edit form", content_type = "text/html", body = String),
        (status = 404, description = "Book not found")
    )
)]
pub async fn edit_book_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = parse_id(&id)?;
    let book = state.services.catalog.get_book(id).await?;

    state.templates.render(
        "books/edit.html",
        context! { title => "Update Book", book => BookDraft::from(&book) },
    )
}

/// Update an existing book
#[utoipa::path(
    post,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body(content = BookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Book updated, redirect to the listing"),
        (status = 200, description = "Form re-rendered with validation errors", content_type = "text/html", body = String),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;

    match state.services.catalog.update_book(id, form.clone()).await {
        Ok(_) => Ok(Redirect::to(BOOKS_PATH).into_response()),
        Err(AppError::Validation(errors)) => {
            // Nothing was stored: show the attempted values under the original id.
            let page = state.templates.render(
                "books/edit.html",
                context! {
                    title => "Update Book",
                    book => BookDraft::from_form(id, form),
                    errors => field_errors(&errors),
                },
            )?;
            Ok(page.into_response())
        }
        Err(e) => Err(e),
    }
}

/// Delete a book
#[utoipa::path(
    post,
    path = "/books/{id}/delete",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 303, description = "Book deleted, redirect to the listing"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Redirect> {
    let id = parse_id(&id)?;
    state.services.catalog.delete_book(id).await?;
    Ok(Redirect::to(BOOKS_PATH))
}

/// Site root
pub async fn index() -> Redirect {
    Redirect::to(BOOKS_PATH)
}

/// Fallback for unknown paths
pub async fn not_found() -> AppError {
    AppError::NotFound("No such page".to_string())
}

#[cfg(test)]
mod tests {
    use super::parse_id;
    use crate::error::AppError;

    #[test]
    fn non_numeric_id_is_not_found() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert!(matches!(parse_id("abc"), Err(AppError::NotFound(_))));
        assert!(matches!(parse_id("99999999999"), Err(AppError::NotFound(_))));
    }
}
