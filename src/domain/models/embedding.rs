//! Embedding domain models
//!
//! Feature-extraction endpoints answer with a shape that depends on the model
//! and on how many inputs were sent: a bare number, a flat vector, or nested
//! vectors (one per input, sometimes one per token). [`EmbeddingResponse`]
//! captures that shape once, and is the only place that turns it into
//! the flat `Vec<f32>` vectors the rest of the system works with.

use serde_json::Value;

use crate::domain::errors::{DomainError, DomainResult};

/// A flat, ordered embedding vector.
pub type EmbeddingVector = Vec<f32>;

/// Raw inference output, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddingResponse {
    /// A single number.
    Scalar(f32),
    /// A flat sequence of numbers.
    FlatVector(Vec<f32>),
    /// A sequence containing at least one nested sequence.
    BatchOfVectors(Vec<EmbeddingResponse>),
}

impl EmbeddingResponse {
    /// Classify a raw JSON inference response.
    ///
    /// Numbers and arrays (of numbers or further arrays) are accepted;
    /// anything else is an [`DomainError::InvalidEmbeddingFormat`].
    /// Coercion is strict: a numeric string such as `"0.5"` is rejected,
    /// never parsed.
    pub fn from_value(value: &Value) -> DomainResult<Self> {
        match value {
            Value::Number(number) => number_to_f32(number).map(Self::Scalar),
            Value::Array(items) => {
                let numbers: Option<Vec<&serde_json::Number>> = items
                    .iter()
                    .map(|item| match item {
                        Value::Number(number) => Some(number),
                        _ => None,
                    })
                    .collect();
                if let Some(numbers) = numbers {
                    numbers
                        .into_iter()
                        .map(number_to_f32)
                        .collect::<DomainResult<Vec<f32>>>()
                        .map(Self::FlatVector)
                } else {
                    items
                        .iter()
                        .map(Self::from_value)
                        .collect::<DomainResult<Vec<_>>>()
                        .map(Self::BatchOfVectors)
                }
            }
            other => Err(DomainError::InvalidEmbeddingFormat(format!(
                "expected a number or an array, got {}",
                value_kind(other)
            ))),
        }
    }

    /// Flatten into one vector, preserving element order.
    pub fn flatten(&self) -> EmbeddingVector {
        let mut out = Vec::with_capacity(self.len_hint());
        self.flatten_into(&mut out);
        out
    }

    /// Split a response to a batched request into one vector per input.
    ///
    /// `expected` is the number of inputs that were sent. A flat vector with
    /// one entry per input (and more than one input) means the model produced
    /// a single scalar per input.
    pub fn into_per_input(self, expected: usize) -> DomainResult<Vec<EmbeddingVector>> {
        match self {
            Self::BatchOfVectors(items) if items.len() == expected => {
                Ok(items.iter().map(Self::flatten).collect())
            }
            Self::FlatVector(values) if expected == 1 => Ok(vec![values]),
            Self::FlatVector(values) if values.len() == expected => {
                Ok(values.into_iter().map(|value| vec![value]).collect())
            }
            Self::Scalar(value) if expected == 1 => Ok(vec![vec![value]]),
            other => Err(DomainError::InvalidEmbeddingFormat(format!(
                "expected {} embeddings, got {}",
                expected,
                other.entry_count()
            ))),
        }
    }

    fn flatten_into(&self, out: &mut Vec<f32>) {
        match self {
            Self::Scalar(value) => out.push(*value),
            Self::FlatVector(values) => out.extend_from_slice(values),
            Self::BatchOfVectors(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }

    fn entry_count(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::FlatVector(values) => values.len(),
            Self::BatchOfVectors(items) => items.len(),
        }
    }

    fn len_hint(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::FlatVector(values) => values.len(),
            Self::BatchOfVectors(items) => items.iter().map(Self::len_hint).sum(),
        }
    }
}

/// Normalize a single-input inference response into a flat vector.
pub fn normalize_embedding(value: &Value) -> DomainResult<EmbeddingVector> {
    EmbeddingResponse::from_value(value).map(|response| response.flatten())
}

#[allow(clippy::cast_possible_truncation)]
fn number_to_f32(number: &serde_json::Number) -> DomainResult<f32> {
    number.as_f64().map(|value| value as f32).ok_or_else(|| {
        DomainError::InvalidEmbeddingFormat(format!("{number} is not representable as a float"))
    })
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_becomes_single_element() {
        assert_eq!(normalize_embedding(&json!(0.5)).unwrap(), vec![0.5]);
        assert_eq!(normalize_embedding(&json!(3)).unwrap(), vec![3.0]);
    }

    #[test]
    fn test_flat_vector_is_unchanged() {
        let vector = normalize_embedding(&json!([0.25, -1.5, 2])).unwrap();
        assert_eq!(vector, vec![0.25, -1.5, 2.0]);
    }

    #[test]
    fn test_nested_vector_flattens_in_order() {
        let vector = normalize_embedding(&json!([[1, 2], [3], 4])).unwrap();
        assert_eq!(vector, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_deeper_nesting_flattens_fully() {
        let vector = normalize_embedding(&json!([[[1, 2], [3]], [[4]]])).unwrap();
        assert_eq!(vector, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_empty_array_is_empty_vector() {
        assert!(normalize_embedding(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_non_numeric_inputs_rejected() {
        for value in [json!("0.1"), json!(true), json!(null), json!({"embedding": [1]})] {
            let err = normalize_embedding(&value).unwrap_err();
            assert!(
                matches!(err, DomainError::InvalidEmbeddingFormat(_)),
                "unexpected error for {value}: {err}"
            );
        }
    }

    #[test]
    fn test_numeric_strings_not_coerced() {
        let err = normalize_embedding(&json!(["0.5", "0.25"])).unwrap_err();
        assert!(matches!(err, DomainError::InvalidEmbeddingFormat(_)));
        assert!(EmbeddingResponse::from_value(&json!([["1", 2.0]])).is_err());
    }

    #[test]
    fn test_non_numeric_element_rejected() {
        let err = normalize_embedding(&json!([1, "two", 3])).unwrap_err();
        assert!(matches!(err, DomainError::InvalidEmbeddingFormat(_)));
    }

    #[test]
    fn test_classification() {
        assert_eq!(
            EmbeddingResponse::from_value(&json!(1.0)).unwrap(),
            EmbeddingResponse::Scalar(1.0)
        );
        assert_eq!(
            EmbeddingResponse::from_value(&json!([1.0, 2.0])).unwrap(),
            EmbeddingResponse::FlatVector(vec![1.0, 2.0])
        );
        assert!(matches!(
            EmbeddingResponse::from_value(&json!([[1.0], [2.0]])).unwrap(),
            EmbeddingResponse::BatchOfVectors(items) if items.len() == 2
        ));
    }

    #[test]
    fn test_per_input_batch() {
        let response = EmbeddingResponse::from_value(&json!([[0.1, 0.2], [[0.3], [0.4]]])).unwrap();
        let vectors = response.into_per_input(2).unwrap();
        assert_eq!(vectors, vec![vec![0.1, 0.2], vec![0.3, 0.4]]);
    }

    #[test]
    fn test_per_input_single_flat_vector() {
        let response = EmbeddingResponse::FlatVector(vec![0.1, 0.2, 0.3]);
        assert_eq!(response.into_per_input(1).unwrap(), vec![vec![0.1, 0.2, 0.3]]);
    }

    #[test]
    fn test_per_input_scalar_per_input() {
        let response = EmbeddingResponse::FlatVector(vec![0.1, 0.2, 0.3]);
        let vectors = response.into_per_input(3).unwrap();
        assert_eq!(vectors, vec![vec![0.1], vec![0.2], vec![0.3]]);
    }

    #[test]
    fn test_per_input_count_mismatch() {
        let response = EmbeddingResponse::BatchOfVectors(vec![
            EmbeddingResponse::FlatVector(vec![1.0]),
            EmbeddingResponse::FlatVector(vec![2.0]),
        ]);
        let err = response.into_per_input(3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid embedding format: expected 3 embeddings, got 2"
        );
    }
}
