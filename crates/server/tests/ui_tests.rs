//! HTTP tests for the interactive UI routes.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::*;
use server::build_ui_router;
use server::routes::ui::{SearchResponse, UPLOAD_PLACEHOLDER};
use tower::ServiceExt;

fn ui_with_assets(files: &[&str]) -> (axum::Router, tempfile::TempDir) {
    let assets = tempfile::tempdir().unwrap();
    for name in files {
        std::fs::write(assets.path().join(name), png_bytes(&solid(1, 1, 1))).unwrap();
    }
    let state = state_with(
        color_catalog(),
        Arc::new(RecordingFetcher::default()),
        assets.path(),
    );
    (build_ui_router(state), assets)
}

async fn search(app: axum::Router, field: &str, data: &[u8]) -> SearchResponse {
    let response = app
        .oneshot(multipart_post("/search", field, data))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    serde_json::from_value(body_json(response).await).unwrap()
}

#[tokio::test]
async fn index_serves_search_page() {
    let (app, _assets) = ui_with_assets(&[]);
    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("Visual Product Matcher"));
    assert!(html.contains(r#"name="image""#));
    assert!(html.contains("paste"));
}

#[tokio::test]
async fn empty_upload_shows_placeholder() {
    let (app, _assets) = ui_with_assets(&[]);
    let result = search(app, "image", b"").await;
    assert_eq!(result.text, UPLOAD_PLACEHOLDER);
    assert!(result.gallery.is_empty());
}

#[tokio::test]
async fn missing_field_shows_placeholder() {
    let (app, _assets) = ui_with_assets(&[]);
    let result = search(app, "something_else", b"data").await;
    assert_eq!(result.text, UPLOAD_PLACEHOLDER);
    assert!(result.gallery.is_empty());
}

#[tokio::test]
async fn bad_image_is_reported_in_text() {
    let (app, _assets) = ui_with_assets(&[]);
    let result = search(app, "image", b"definitely not a png").await;
    assert!(result.text.starts_with("Error: "), "text = {}", result.text);
    assert!(result.gallery.is_empty());
}

#[tokio::test]
async fn search_renders_results_and_gallery() {
    // Only products 1 and 3 have files on disk
    let (app, _assets) = ui_with_assets(&["product_1.jpg", "product_3.jpg"]);
    let result = search(app, "image", &png_bytes(&solid(220, 20, 20))).await;

    assert!(result.text.starts_with("# Search Results\n"));
    assert!(result.text.contains("### 1. Red Shirt"));
    assert!(result.text.contains("**Price:** $25\n"));
    assert!(result.text.contains("**Similarity:** 100.0%"));
    assert!(result.text.contains("**Category:** Apparel"));
    assert!(result.text.contains("*Red Shirt for tests*"));
    assert!(!result.text.contains("Mystery Box"));
    assert_eq!(result.text.matches("---").count(), 3);

    assert_eq!(result.gallery.len(), 2);
    assert_eq!(result.gallery[0], "/file/product_1.jpg");
    assert!(result.gallery.contains(&"/file/product_3.jpg".to_string()));
}

#[tokio::test]
async fn asset_files_are_served() {
    let (app, _assets) = ui_with_assets(&["product_2.jpg"]);

    let response = app.clone().oneshot(get("/file/product_2.jpg")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, png_bytes(&solid(1, 1, 1)));

    let response = app.oneshot(get("/file/missing.jpg")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
