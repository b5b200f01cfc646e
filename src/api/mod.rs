//! HTTP handlers and router for Bookshelf

pub mod books;
pub mod health;
pub mod openapi;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer, trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(books::index))
        // Books
        .route("/books", get(books::list_books))
        .route("/books/new", get(books::new_book_form).post(books::create_book))
        .route("/books/:id", get(books::edit_book_form).post(books::update_book))
        .route("/books/:id/delete", post(books::delete_book))
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .merge(openapi::create_openapi_router())
        .fallback(books::not_found)
        .with_state(state)
        .layer(CatchPanicLayer::new())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}
