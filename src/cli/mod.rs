//! Command-line interface.
//!
//! `serve` runs the HTTP query endpoint, `seed` loads a catalog into the
//! vector index, and `search` runs a single query from the terminal.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::{search::SearchArgs, seed::SeedArgs, serve::ServeArgs};

#[derive(Parser, Debug)]
#[command(name = "product-search")]
#[command(about = "Semantic product search over a vector index", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./product-search.yaml when present)
    #[arg(short, long, global = true, env = "PRODUCT_SEARCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the search API over HTTP
    Serve(ServeArgs),

    /// Embed the product catalog and upsert it into the vector index
    Seed(SeedArgs),

    /// Run one search query and print the matching products
    Search(SearchArgs),
}

/// Report a failed command and exit with a non-zero status.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "error": format!("{err:#}"),
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {:#}", console::style("error:").red().bold(), err);
    }
    std::process::exit(1);
}
