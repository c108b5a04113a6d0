//! Product catalog models.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// Catalog shipped with the crate, used when no catalog path is configured.
const BUNDLED_CATALOG: &str = include_str!("../../../data/products.json");

/// A product as authored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-text description, embedded with the name
    pub description: String,
    /// Price in the store currency, never negative
    pub price: f64,
    /// Store category
    pub category: String,
    /// Brand name
    pub brand: String,
    /// Average review score (e.g. 4.5)
    pub rating: f64,
    /// Whether the product can be ordered
    pub in_stock: bool,
    /// Product image URL
    pub image: String,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl Product {
    /// Text submitted to the embedding model for this product.
    pub fn embedding_text(&self) -> String {
        format!("{} : {}", self.name, self.description)
    }
}

/// An ordered, id-unique list of products.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and negative prices.
    pub fn new(products: Vec<Product>) -> DomainResult<Self> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if product.id.trim().is_empty() {
                return Err(DomainError::ValidationFailed(format!(
                    "product '{}' has an empty id",
                    product.name
                )));
            }
            if !seen.insert(product.id.as_str()) {
                return Err(DomainError::ValidationFailed(format!(
                    "duplicate product id '{}' in catalog",
                    product.id
                )));
            }
            if product.price < 0.0 {
                return Err(DomainError::ValidationFailed(format!(
                    "product '{}' has a negative price",
                    product.id
                )));
            }
        }
        Ok(Self { products })
    }

    /// Parse a catalog from a JSON array of products.
    pub fn from_json(json: &str) -> DomainResult<Self> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// Load a catalog from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> DomainResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            DomainError::ValidationFailed(format!(
                "failed to read catalog {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }

    /// The catalog compiled into the binary.
    pub fn bundled() -> DomainResult<Self> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Products in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
