//! Zentrix Backend Binary
//!
//! Serves the REST API on PORT (default 3000). Settings come from flags,
//! the environment, or a `.env` file in the working directory.
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = zx_server::Config::parse();
    zx_core::log()?;
    zx_server::run(config).await
}
