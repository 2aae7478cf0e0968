// ============================================================
// Layer 3 — Encoded Batches and the Tokenized Artifact
// ============================================================
// EncodedBatch is what an encoder returns for one split:
//   input_ids:      [rows, width]   token ids, right-padded
//   attention_mask: [rows, width]   1 = real token, 0 = padding
//
// TokenizedBatch is the persisted, self-describing form:
// the same two tables plus the scheme name, the truncation
// ceiling, and any integer label columns aligned row-for-row.
//
// Serialised layout (label columns sit at the top level):
//   {
//     "model_name": "bert-base-uncased",
//     "max_length": 256,
//     "input_ids": [[101, 2054, 102, 0], ...],
//     "attention_mask": [[1, 1, 1, 0], ...],
//     "label_id": [2, 0, ...]
//   }

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Padded ids and mask for one bulk encoding call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedBatch {
    pub input_ids:      Vec<Vec<u32>>,
    pub attention_mask: Vec<Vec<u32>>,
}

impl EncodedBatch {
    /// Number of encoded records.
    /// Number of encoded records.
    pub fn rows(&self) -> usize {
        self.input_ids.len()
    }

    /// Common padded width of every sequence (0 for an empty batch).
    pub fn width(&self) -> usize {
        self.input_ids.first().map_or(0, Vec::len)
    }

    /// Count of real (non-padding) tokens in row `i`.
    #[cfg(test)]
    pub fn real_tokens(&self, i: usize) -> usize {
        self.attention_mask[i].iter().filter(|&&m| m == 1).count()
    }
}

/// The artifact written once per split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizedBatch {
    /// Scheme the ids belong to
    pub model_name:     String,
    /// Truncation ceiling used
    pub max_length:     usize,
    pub input_ids:      Vec<Vec<u32>>,
    pub attention_mask: Vec<Vec<u32>>,
    /// Integer label columns, stored as top-level keys
    #[serde(flatten)]
    pub labels:         BTreeMap<String, Vec<i64>>,
}

impl TokenizedBatch {
    pub fn new(model_name: impl Into<String>, max_length: usize, encoded: EncodedBatch) -> Self {
        Self {
            model_name:     model_name.into(),
            max_length,
            input_ids:      encoded.input_ids,
            attention_mask: encoded.attention_mask,
            labels:         BTreeMap::new(),
        }
    }

    /// Attach one label column. Returns an error if it is not row-aligned.
    pub fn with_labels(mut self, name: impl Into<String>, values: Vec<i64>) -> Result<Self, String> {
        let name = name.into();
        if values.len() != self.input_ids.len() {
            return Err(format!(
                "label column '{name}' has {} values for {} encoded rows",
                values.len(),
                self.input_ids.len()
            ));
        }
        self.labels.insert(name, values);
        Ok(self)
    }

    pub fn rows(&self) -> usize {
        self.input_ids.len()
    }

    /// `(rows, width)` of the id and mask tables.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.input_ids.first().map_or(0, Vec::len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EncodedBatch {
        EncodedBatch {
            input_ids:      vec![vec![5, 6, 7], vec![8, 0, 0]],
            attention_mask: vec![vec![1, 1, 1], vec![1, 0, 0]],
        }
    }

    #[test]
    fn test_encoded_batch_accessors() {
        let batch = sample();
        assert_eq!(batch.rows(), 2);
        assert_eq!(batch.width(), 3);
        assert_eq!(batch.real_tokens(1), 1);
    }

    #[test]
    fn test_labels_must_align_with_rows() {
        let artifact = TokenizedBatch::new("bert-base-uncased", 256, sample());
        assert!(artifact.clone().with_labels("label_id", vec![0]).is_err());

        let artifact = artifact.with_labels("label_id", vec![1, 0]).unwrap();
        assert_eq!(artifact.labels["label_id"], vec![1, 0]);
        assert_eq!(artifact.shape(), (2, 3));
    }

    #[test]
    fn test_label_columns_serialise_at_top_level() {
        let artifact = TokenizedBatch::new("m", 4, sample())
            .with_labels("label_id", vec![2, 0])
            .unwrap();
        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["model_name"], "m");
        assert_eq!(json["max_length"], 4);
        assert_eq!(json["label_id"], serde_json::json!([2, 0]));

        let back: TokenizedBatch = serde_json::from_value(json).unwrap();
        assert_eq!(back, artifact);
    }
}
