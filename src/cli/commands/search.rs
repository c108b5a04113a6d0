//! Implementation of the `product-search search` command.

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use serde::Serialize;

use crate::cli::output::{output, supports_color, truncate, CommandOutput};
use crate::domain::models::{Config, ProductMatch};
use crate::infrastructure::setup;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free-text query
    pub query: String,

    /// Number of results to request (overrides search.top_k)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
}

/// Search results; serialized as the same array the HTTP endpoint returns.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct SearchOutput {
    /// Matches in rank order.
    pub products: Vec<ProductMatch>,
}

impl CommandOutput for SearchOutput {
    fn to_human(&self) -> String {
        if self.products.is_empty() {
            return "No matching products.".to_string();
        }

        let use_colors = supports_color();
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(
            ["#", "Name", "Brand", "Category", "Price", "Rating", "Stock", "Colors", "Score"]
                .into_iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );

        for (rank, product) in self.products.iter().enumerate() {
            let in_stock = product.flag("inStock").unwrap_or(false);
            let stock_cell = match (use_colors, in_stock) {
                (true, true) => Cell::new("yes").fg(Color::Green),
                (true, false) => Cell::new("no").fg(Color::Red),
                (false, true) => Cell::new("yes"),
                (false, false) => Cell::new("no"),
            };

            table.add_row(vec![
                Cell::new(rank + 1),
                Cell::new(truncate(product.text("name").unwrap_or("-"), 40)),
                Cell::new(product.text("brand").unwrap_or("-")),
                Cell::new(product.text("category").unwrap_or("-")),
                Cell::new(
                    product
                        .number("price")
                        .map_or_else(|| "-".to_string(), |p| format!("{p:.2}")),
                ),
                Cell::new(
                    product
                        .number("rating")
                        .map_or_else(|| "-".to_string(), |r| format!("{r:.1}")),
                ),
                stock_cell,
                Cell::new(truncate(&product.colors.join(", "), 30)),
                Cell::new(
                    product
                        .score
                        .map_or_else(|| "-".to_string(), |s| format!("{s:.3}")),
                ),
            ]);
        }

        table.to_string()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.products).unwrap_or_default()
    }
}

/// Run one query and print the matches.
pub async fn execute(args: SearchArgs, config: &Config, json_mode: bool) -> Result<()> {
    let mut config = config.clone();
    if let Some(top_k) = args.top_k {
        anyhow::ensure!(top_k > 0, "--top-k must be at least 1");
        config.search.top_k = top_k;
    }

    let service = setup::search_service(&config).context("Failed to configure search service")?;
    let products = service.search(&args.query).await.context("Search failed")?;

    output(&SearchOutput { products }, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{IndexMatch, Metadata, MetadataValue};

    fn product_match() -> ProductMatch {
        let mut metadata = Metadata::new();
        metadata.insert("name".to_string(), MetadataValue::from("Trail Runner"));
        metadata.insert("brand".to_string(), MetadataValue::from("Stride"));
        metadata.insert("price".to_string(), MetadataValue::Number(89.5));
        metadata.insert("inStock".to_string(), MetadataValue::Flag(true));
        metadata.insert("colors".to_string(), MetadataValue::from("red|blue"));
        ProductMatch::from_match(IndexMatch {
            id: "p1".to_string(),
            score: Some(0.87),
            metadata: Some(metadata),
        })
    }

    #[test]
    fn test_human_output_lists_products() {
        let rendered = SearchOutput {
            products: vec![product_match()],
        }
        .to_human();
        assert!(rendered.contains("Trail Runner"));
        assert!(rendered.contains("89.50"));
        assert!(rendered.contains("red, blue"));
    }

    #[test]
    fn test_json_output_is_product_array() {
        let json = SearchOutput {
            products: vec![product_match()],
        }
        .to_json();
        assert_eq!(json[0]["id"], "p1");
        assert_eq!(json[0]["colors"], serde_json::json!(["red", "blue"]));
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(
            SearchOutput { products: vec![] }.to_human(),
            "No matching products."
        );
    }
}
