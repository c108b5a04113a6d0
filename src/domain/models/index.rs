//! Vector index records and the metadata codec.
//!
//! Index metadata only holds scalars and strings, so list-valued product
//! fields travel as `|`-joined strings. Decoding is lenient: a missing or
//! non-string value decodes to an empty list instead of failing the query.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::embedding::EmbeddingVector;
use super::product::Product;

/// Separator used for list-valued metadata fields.
pub const LIST_SEPARATOR: char = '|';

/// Metadata key holding the `|`-joined colors.
pub const COLORS_KEY: &str = "colors";

/// Metadata key holding the `|`-joined features.
pub const FEATURES_KEY: &str = "features";

/// Record key holding the similarity score.
const SCORE_KEY: &str = "score";

/// A single metadata value as stored in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// A string.
    Text(String),
    /// Any number, stored as a float.
    Number(f64),
    /// A boolean.
    Flag(bool),
    /// A list of strings.
    List(Vec<String>),
}

impl MetadataValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Metadata attached to an index record.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// Join list tokens into a single metadata string.
pub fn encode_list<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(&LIST_SEPARATOR.to_string())
}

/// Split a metadata value back into list tokens.
///
/// Absent values, non-string values and the empty string all decode to an
/// empty list. This never fails.
pub fn decode_list(value: Option<&MetadataValue>) -> Vec<String> {
    match value.and_then(MetadataValue::as_str) {
        Some("") | None => Vec::new(),
        Some(text) => text.split(LIST_SEPARATOR).map(str::to_string).collect(),
    }
}

/// Flatten a product into index metadata.
pub fn product_metadata(product: &Product) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("id".to_string(), product.id.as_str().into());
    metadata.insert("name".to_string(), product.name.as_str().into());
    metadata.insert("description".to_string(), product.description.as_str().into());
    metadata.insert("price".to_string(), product.price.into());
    metadata.insert("category".to_string(), product.category.as_str().into());
    metadata.insert("brand".to_string(), product.brand.as_str().into());
    metadata.insert("rating".to_string(), product.rating.into());
    metadata.insert("inStock".to_string(), product.in_stock.into());
    metadata.insert("image".to_string(), product.image.as_str().into());
    metadata.insert(COLORS_KEY.to_string(), encode_list(&product.colors).into());
    metadata.insert(FEATURES_KEY.to_string(), encode_list(&product.features).into());
    metadata
}

/// A record written to the vector index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRecord {
    /// Record id, the product id.
    pub id: String,
    /// Embedding of the product text.
    pub vector: EmbeddingVector,
    /// Flattened product fields.
    pub metadata: Metadata,
}

impl IndexRecord {
    /// Pair a product with its embedding.
    pub fn from_product(product: &Product, vector: EmbeddingVector) -> Self {
        Self {
            id: product.id.clone(),
            vector,
            metadata: product_metadata(product),
        }
    }
}

/// A nearest-neighbor match returned by the vector index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexMatch {
    /// Record id.
    pub id: String,
    /// Similarity score, when the index reports one.
    pub score: Option<f32>,
    /// Stored metadata, when requested.
    pub metadata: Option<Metadata>,
}

/// A display-ready product rebuilt from a match's metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductMatch {
    /// Product id, from metadata when stored there.
    pub id: String,
    /// Similarity score reported by the index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    /// Every other metadata field, copied as stored.
    #[serde(flatten)]
    pub fields: Metadata,
    /// Decoded color list.
    pub colors: Vec<String>,
    /// Decoded feature list.
    pub features: Vec<String>,
}

impl ProductMatch {
    /// Rebuild a product record from an index match.
    pub fn from_match(index_match: IndexMatch) -> Self {
        let mut fields = index_match.metadata.unwrap_or_default();
        let colors = decode_list(fields.remove(COLORS_KEY).as_ref());
        let features = decode_list(fields.remove(FEATURES_KEY).as_ref());
        let id = match fields.remove("id") {
            Some(MetadataValue::Text(id)) => id,
            _ => index_match.id,
        };
        // The similarity score owns the `score` key in the serialized record.
        if index_match.score.is_some() {
            fields.remove(SCORE_KEY);
        }
        Self {
            id,
            score: index_match.score,
            fields,
            colors,
            features,
        }
    }

    /// A string field, if present.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(MetadataValue::as_str)
    }

    /// A numeric field, if present.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(MetadataValue::as_f64)
    }

    /// A boolean field, if present.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.fields.get(key).and_then(MetadataValue::as_bool)
    }
}
