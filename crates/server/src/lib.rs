//! Prodmatch Server - HTTP front ends for the visual product matcher
//!
//! This crate runs two servers over one shared, read-only catalog:
//!
//! - **API server** (default port 5000): JSON matching endpoint for remote
//!   front ends, permissive CORS on every response.
//! - **UI server** (default port 7860): a single search page that uploads an
//!   image and shows the best matches with their product images.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /api/health` - Service status, model and catalog size
//! - `POST /api/match` - `{"image": "<base64>"}` or `{"imageUrl": "<url>"}`
//! - `OPTIONS /api/match` - CORS pre-flight
//!
//! # UI Endpoints
//!
//! - `GET /` - Search page
//! - `POST /search` - Multipart upload, field `image`
//! - `GET /file/{name}` - Product images from the asset root
//!
//! # Configuration
//!
//! Read from an optional `prodmatch.{toml,yaml,json}` file and `PRODMATCH__*`
//! environment variables, e.g. `PRODMATCH__API_PORT=8000` or
//! `PRODMATCH__EMBED__MODE=api`.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_api_router, build_ui_router, init_tracing, run, start_server};
pub use state::ServerState;
