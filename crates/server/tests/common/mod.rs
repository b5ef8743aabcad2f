//! Shared fixtures for the HTTP tests.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;
use std::sync::{Arc, Mutex};

use acquire::{AcquireError, Bytes, Fetcher, ImageAcquirer};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use catalog::{Catalog, CatalogEntry};
use embed::StubEmbedder;
use http_body_util::BodyExt;
use image::{ImageFormat, Rgb, RgbImage};
use matcher::Matcher;
use server::{ServerConfig, ServerState};

pub const BOUNDARY: &str = "prodmatch-test-boundary";

/// Fetcher that records URLs and never touches the network.
#[derive(Default)]
pub struct RecordingFetcher {
    pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl Fetcher for RecordingFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, AcquireError> {
        self.calls.lock().unwrap().push(url.to_string());
        Err(AcquireError::Fetch {
            url: url.to_string(),
            reason: "network disabled in tests".into(),
        })
    }
}

pub fn solid(r: u8, g: u8, b: u8) -> RgbImage {
    RgbImage::from_pixel(16, 16, Rgb([r, g, b]))
}

pub fn png_bytes(img: &RgbImage) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

pub fn png_base64(img: &RgbImage) -> String {
    STANDARD.encode(png_bytes(img))
}

pub fn png_data_url(img: &RgbImage) -> String {
    format!("data:image/png;base64,{}", png_base64(img))
}

pub fn stub() -> StubEmbedder {
    StubEmbedder::new(4).unwrap()
}

fn product(id: &str, name: &str, img: Option<&RgbImage>) -> CatalogEntry {
    CatalogEntry {
        id: id.into(),
        name: name.into(),
        price: 25.into(),
        category: "Apparel".into(),
        description: format!("{name} for tests"),
        image_ref: format!("assets/product/product_{id}.jpg"),
        embedding: img.map(|i| stub().embed_sync(i).unwrap()),
    }
}

/// Red, green and blue products plus one without an embedding.
pub fn color_catalog() -> Catalog {
    Catalog::from_entries(vec![
        product("1", "Red Shirt", Some(&solid(220, 20, 20))),
        product("2", "Green Hat", Some(&solid(20, 200, 40))),
        product("3", "Blue Jeans", Some(&solid(20, 30, 210))),
        product("4", "Mystery Box", None),
    ])
    .unwrap()
}

pub fn state_with(
    catalog: Catalog,
    fetcher: Arc<RecordingFetcher>,
    asset_root: &Path,
) -> Arc<ServerState> {
    let config = ServerConfig {
        asset_root: asset_root.to_path_buf(),
        embed: embed::EmbedConfig {
            stub_grid: 4,
            ..Default::default()
        },
        ..ServerConfig::default()
    };
    let matcher = Matcher::new(catalog, Arc::new(stub()), ImageAcquirer::new(fetcher));
    Arc::new(ServerState::new(config, matcher))
}

pub fn json_post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Multipart request with one field.
pub fn multipart_post(uri: &str, field: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"query.png\"\r\n\
             Content-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}
