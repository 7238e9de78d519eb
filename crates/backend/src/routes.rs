use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // A001 DOCUMENTS
        // ========================================
        .route("/api/a001/documents", get(handlers::a001_document::list))
        .route(
            "/api/a001/documents/testdata",
            post(handlers::a001_document::insert_test_data),
        )
        .route(
            "/api/a001/documents/:id",
            get(handlers::a001_document::get_by_id).delete(handlers::a001_document::trash),
        )
        .route(
            "/api/a001/documents/:id/metadata",
            put(handlers::a001_document::update_metadata),
        )
        .route(
            "/api/a001/documents/:id/processed",
            post(handlers::a001_document::set_processed),
        )
        .route(
            "/api/a001/documents/:id/restore",
            post(handlers::a001_document::restore),
        )
        .route(
            "/api/a001/documents/:id/history",
            get(handlers::a001_document::history),
        )
        // Options of the metadata form's lookup fields
        .route(
            "/api/a001/metadata/options/:field",
            get(handlers::a001_document::metadata_options),
        )
}
