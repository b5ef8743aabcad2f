//! Prodmatch Server - visual product matcher
//!
//! Starts the JSON API and the interactive search page against one catalog.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Local overrides for development
    dotenvy::dotenv().ok();

    let config = ServerConfig::load()?;

    server::start_server(config).await?;

    Ok(())
}
