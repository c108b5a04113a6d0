//! Implementation of the `product-search serve` command.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use crate::domain::models::Config;
use crate::infrastructure::http::SearchHttpServer;
use crate::infrastructure::setup;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Host to bind to (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Serve the search API until Ctrl-C.
pub async fn execute(args: ServeArgs, config: &Config) -> Result<()> {
    let mut server_config = config.server.clone();
    if let Some(host) = args.host {
        server_config.host = host;
    }
    if let Some(port) = args.port {
        anyhow::ensure!(port != 0, "--port must not be 0");
        server_config.port = port;
    }

    let search = setup::search_service(config).context("Failed to configure search service")?;

    tracing::info!(
        top_k = search.top_k(),
        cors = server_config.enable_cors,
        "starting search API"
    );
    SearchHttpServer::new(Arc::new(search), server_config)
        .serve()
        .await
}
