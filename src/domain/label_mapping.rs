// ============================================================
// Layer 3 — LabelMapping Domain Type
// ============================================================
// A bijection between label strings and contiguous ids 0..N-1.
//
// Ids are assigned after sorting the distinct labels, so the
// result depends only on the SET of labels seen in the training
// split — never on row order or how often a label repeats.
//
// Example:
//   training labels: ["Clear Reply", "Ambivalent", "Clear Reply"]
//   label2id:        {"Ambivalent": 0, "Clear Reply": 1}
//   id2label:        {0: "Ambivalent", 1: "Clear Reply"}
//
// Reference: Rust Book §8 (Collections)

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Label vocabulary in both directions.
///
/// Serialised as `{"label2id": {...}, "id2label": {...}}`; JSON
/// object keys are strings, so ids appear as `"0"`, `"1"`, ...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMapping {
    pub label2id: BTreeMap<String, u32>,
    pub id2label: BTreeMap<u32, String>,
}

impl LabelMapping {
    /// Build the vocabulary from a label column.
    ///
    /// `None` entries are missing values and are not labels.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        // BTreeSet both de-duplicates and sorts (byte order == code point order)
        let distinct: BTreeSet<String> = labels
            .into_iter()
            .flatten()
            .map(Into::into)
            .collect();

        let label2id: BTreeMap<String, u32> = distinct
            .into_iter()
            .enumerate()
            .map(|(i, label)| (label, i as u32))
            .collect();

        let id2label = label2id
            .iter()
            .map(|(label, &id)| (id, label.clone()))
            .collect();

        Self { label2id, id2label }
    }

    /// Look up the id of a raw label; missing or unseen labels map to `None`.
    pub fn id_of(&self, label: Option<&str>) -> Option<u32> {
        label.and_then(|l| self.label2id.get(l).copied())
    }

    /// Reverse lookup of an id.
    pub fn label_of(&self, id: u32) -> Option<&str> {
        self.id2label.get(&id).map(String::as_str)
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.label2id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.label2id.is_empty()
    }

    /// Check the bijection invariants of a mapping read back from disk.
    pub fn check_bijection(&self) -> Result<(), String> {
        if self.label2id.len() != self.id2label.len() {
            return Err(format!(
                "label2id has {} entries but id2label has {}",
                self.label2id.len(),
                self.id2label.len()
            ));
        }

        for (label, &id) in &self.label2id {
            if id as usize >= self.label2id.len() {
                return Err(format!("id {id} for '{label}' is outside 0..{}", self.len()));
            }
            match self.label_of(id) {
                Some(back) if back == label => {}
                Some(back) => {
                    return Err(format!("id {id} maps to '{label}' but back to '{back}'"))
                }
                None => return Err(format!("id {id} for '{label}' missing from id2label")),
            }
        }

        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn labels(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn test_bijection_law() {
        let raw = labels(&[
            Some("Clear Reply"),
            Some("Ambivalent"),
            Some("Clear Non-Reply"),
            Some("Ambivalent"),
        ]);
        let mapping = LabelMapping::from_labels(raw.clone());

        let distinct: BTreeSet<_> = raw.iter().flatten().collect();
        assert_eq!(mapping.len(), distinct.len());

        for label in distinct {
            let id = mapping.label2id[label];
            assert_eq!(mapping.label_of(id), Some(label.as_str()));
        }
        assert!(mapping.check_bijection().is_ok());
    }

    #[test]
    fn test_ids_are_contiguous_and_sorted() {
        let mapping = LabelMapping::from_labels(labels(&[Some("b"), Some("c"), Some("a")]));
        let ids: Vec<u32> = mapping.id2label.keys().copied().collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(mapping.label2id["a"], 0);
        assert_eq!(mapping.label2id["c"], 2);
    }

    #[test]
    fn test_independent_of_row_order_and_duplicates() {
        let a = LabelMapping::from_labels(labels(&[Some("x"), Some("y"), Some("x")]));
        let b = LabelMapping::from_labels(labels(&[Some("y"), Some("y"), Some("x")]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_values_are_not_labels() {
        let mapping = LabelMapping::from_labels(labels(&[None, Some("clear"), None]));
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.id_of(None), None);
    }

    #[test]
    fn test_unseen_label_has_no_id() {
        let mapping = LabelMapping::from_labels(labels(&[Some("clear"), Some("clear")]));
        assert_eq!(mapping.label2id.get("clear"), Some(&0));
        assert_eq!(mapping.id_of(Some("evasive")), None);
    }

    #[test]
    fn test_check_bijection_rejects_mismatch() {
        let mut mapping = LabelMapping::from_labels(labels(&[Some("a"), Some("b")]));
        mapping.id2label.insert(1, "z".to_string());
        assert!(mapping.check_bijection().is_err());

        let mut gap = LabelMapping::from_labels(labels(&[Some("a")]));
        gap.label2id.insert("a".to_string(), 5);
        gap.id2label = [(5, "a".to_string())].into_iter().collect();
        assert!(gap.check_bijection().is_err());
    }
}
