//! Interactive search page.
//!
//! The page posts the selected image as multipart form data and renders the
//! markdown-ish text and the gallery it gets back. Pipeline failures are
//! reported in the text panel, never as an error status.

use crate::state::ServerState;
use axum::extract::{Multipart, State};
use axum::response::Html;
use axum::Json;
use matcher::{MatchError, RankedResult};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::Arc;

/// Text shown when the form is submitted without an image.
pub const UPLOAD_PLACEHOLDER: &str = "Please upload an image";

/// Multipart field carrying the query image.
pub const IMAGE_FIELD: &str = "image";

/// Search response rendered by the page
#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub text: String,
    pub gallery: Vec<String>,
}

impl SearchResponse {
    fn message(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            gallery: Vec::new(),
        }
    }
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Run one search from the page.
pub async fn search(
    State(state): State<Arc<ServerState>>,
    multipart: Multipart,
) -> Json<SearchResponse> {
    let upload = match read_image_field(multipart).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Json(SearchResponse::message(UPLOAD_PLACEHOLDER)),
        Err(msg) => {
            tracing::error!(error = %msg, "ui upload failed");
            return Json(SearchResponse::message(format!("Error: {msg}")));
        }
    };

    match run_search(&state, upload).await {
        Ok(results) => Json(SearchResponse {
            text: render_results(&results),
            gallery: resolve_gallery(&state, &results).await,
        }),
        Err(e) => {
            tracing::error!(error = %e, "ui search failed");
            Json(SearchResponse::message(format!("Error: {e}")))
        }
    }
}

async fn read_image_field(mut multipart: Multipart) -> Result<Option<axum::body::Bytes>, String> {
    while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let bytes = field.bytes().await.map_err(|e| e.to_string())?;
        return Ok((!bytes.is_empty()).then_some(bytes));
    }
    Ok(None)
}

async fn run_search(
    state: &ServerState,
    upload: axum::body::Bytes,
) -> Result<Vec<RankedResult>, MatchError> {
    let bitmap = tokio::task::spawn_blocking(move || acquire::decode_bytes(&upload))
        .await
        .map_err(|e| {
            MatchError::Decode(acquire::AcquireError::Decode(format!(
                "decoder task failed: {e}"
            )))
        })??;
    state
        .matcher
        .match_bitmap(&bitmap, state.config.ui_top_k)
        .await
}

/// Render ranked results as the text panel.
pub fn render_results(results: &[RankedResult]) -> String {
    let mut out = String::from("# Search Results\n");
    for (i, product) in results.iter().enumerate() {
        let _ = writeln!(out, "\n### {}. {}", i + 1, product.name);
        let _ = writeln!(out, "**Price:** ${}", product.price);
        let _ = writeln!(
            out,
            "**Similarity:** {:.1}%",
            f64::from(product.similarity) * 100.0
        );
        let _ = writeln!(out, "**Category:** {}", product.category);
        if !product.description.is_empty() {
            let _ = writeln!(out, "*{}*", product.description);
        }
        out.push_str("---");
    }
    out
}

/// Gallery URLs for results whose image exists under the asset root.
pub async fn resolve_gallery(state: &ServerState, results: &[RankedResult]) -> Vec<String> {
    let mut gallery = Vec::with_capacity(results.len());
    for name in results.iter().map(RankedResult::image_file_name) {
        if state.asset_path(name).await.is_some() {
            gallery.push(state.asset_url(name));
        }
    }
    gallery
}

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Visual Product Matcher</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; }
  #drop { border: 2px dashed #999; padding: 1.5rem; text-align: center; }
  #preview { max-width: 240px; display: block; margin: 1rem auto; }
  #results { white-space: pre-wrap; }
  #gallery { display: grid; grid-template-columns: repeat(3, 1fr); gap: .5rem; }
  #gallery img { width: 100%; object-fit: contain; }
</style>
</head>
<body>
<h1>Visual Product Matcher</h1>
<p>Upload a product image, take a photo, or paste one from the clipboard to find similar items.</p>
<form id="form">
  <div id="drop">
    <input id="file" type="file" name="image" accept="image/*" capture="environment">
    <img id="preview" alt="" hidden>
  </div>
  <button type="submit">Search Similar Products</button>
</form>
<div id="results"></div>
<div id="gallery"></div>
<script>
  const form = document.getElementById('form');
  const input = document.getElementById('file');
  const preview = document.getElementById('preview');
  let pasted = null;

  function show(blob) {
    preview.src = URL.createObjectURL(blob);
    preview.hidden = false;
  }

  input.addEventListener('change', () => {
    pasted = null;
    if (input.files[0]) show(input.files[0]);
  });

  document.addEventListener('paste', (e) => {
    for (const item of e.clipboardData.items) {
      if (item.type.startsWith('image/')) {
        pasted = item.getAsFile();
        show(pasted);
        break;
      }
    }
  });

  form.addEventListener('submit', async (e) => {
    e.preventDefault();
    const data = new FormData();
    const image = pasted || input.files[0];
    if (image) data.append('image', image);
    const res = await fetch('/search', { method: 'POST', body: data });
    const body = await res.json();
    document.getElementById('results').textContent = body.text;
    const gallery = document.getElementById('gallery');
    gallery.replaceChildren(...body.gallery.map((src) => {
      const img = document.createElement('img');
      img.src = src;
      return img;
    }));
  });
</script>
</body>
</html>
"#;
