//! Route registration: collects all module routes + system endpoints and pages.

use axum::Router;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use medinv_core::now_rfc3339;
use tracing::info;

/// Build the complete router with all routes.
pub fn build_router(module_routes: Vec<(&str, Router)>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/", get(index_page))
        .route("/device/new", get(form_page))
        .route("/device/{id}", get(device_page))
        .route("/device/{id}/edit", get(form_page));

    // Modules own their paths, so they merge at the root.
    for (name, router) in module_routes {
        info!("Mounted {} routes", name);
        app = app.merge(router);
    }

    app
}

async fn index_page() -> impl IntoResponse {
    Html(include_str!("web/index.html"))
}

async fn device_page() -> impl IntoResponse {
    Html(include_str!("web/device.html"))
}

/// Serves both the create and the edit form; the page picks its mode from the URL.
async fn form_page() -> impl IntoResponse {
    Html(include_str!("web/form.html"))
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
        "time": now_rfc3339(),
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "medinvd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
