//! Royalty Ledger server
//!
//! Serves author earnings and withdrawal endpoints over HTTP.
//!
//! # Usage
//!
//! ```bash
//! PORT=3000 cargo run
//! ```
//!
//! # Environment Variables
//!
//! - `PORT`: Listening port (default 3000)
//! - `RUST_LOG`: Set to `info` or `debug` to control logging verbosity

use log::info;
use royalty_ledger::{api, Catalog, Config, RoyaltyLedger, ServiceError};
use std::process;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServiceError> {
    let config = Config::from_env()?;
    let ledger = Arc::new(RoyaltyLedger::new(Catalog::seed()));

    let listener = TcpListener::bind(config.socket_addr()).await?;
    info!("Server running on port {}", listener.local_addr()?.port());

    axum::serve(listener, api::router(ledger)).await?;
    Ok(())
}
