// ============================================================
// Layer 3 — Records and Split Schema
// ============================================================
// A split is a CSV table whose columns vary: some splits carry
// a label column, some do not, and every split carries extra
// metadata columns we never interpret.
//
// Instead of checking for columns all over the pipeline, each
// stage states a SplitSchema (required + optional columns) once.
// Binding it to a header row either fails with a SchemaError or
// yields a ColumnIndex, from which typed RawRecords are read.
//
// A cell is "missing" when it is empty or spells one of the
// usual NA markers (NaN, N/A, null, ...). The raw exports were
// written by pandas, so the marker list is pandas' default one.
// Markers are matched exactly: " NaN" or "nan value" are text.
//
// Reference: Rust Book §5 (Structs), §6 (Option)

use std::collections::BTreeMap;

use crate::domain::error::{PrepError, PrepResult};

pub const QUESTION: &str = "question";
pub const INTERVIEW_ANSWER: &str = "interview_answer";
pub const MODEL_TEXT: &str = "model_text";
pub const LABEL_ID: &str = "label_id";

/// Cell values read as missing.
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan",
    "1.#IND", "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None",
    "n/a", "nan", "null",
];

/// Whether a raw cell value stands for a missing value.
pub fn is_missing(value: &str) -> bool {
    NA_VALUES.contains(&value)
}

/// Columns a stage needs from a split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSchema {
    pub required: Vec<String>,
    pub optional: Vec<String>,
}

impl SplitSchema {
    /// Schema for building the label vocabulary: only the label column matters.
    pub fn labelled(label_column: &str) -> Self {
        Self {
            required: vec![label_column.to_string()],
            optional: Vec::new(),
        }
    }

    /// Schema for composing model text from a raw split.
    pub fn interview(label_column: &str) -> Self {
        Self {
            required: vec![QUESTION.to_string(), INTERVIEW_ANSWER.to_string()],
            optional: vec![label_column.to_string()],
        }
    }

    /// Schema for encoding a processed split.
    pub fn encoded(text_column: &str, label_columns: &[String]) -> Self {
        Self {
            required: vec![text_column.to_string()],
            optional: label_columns.to_vec(),
        }
    }

    /// Check the header row once and remember where each column lives.
    pub fn bind(&self, split: &str, headers: &[String]) -> PrepResult<ColumnIndex> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let mut positions = BTreeMap::new();

        for name in &self.required {
            let idx = find(name).ok_or_else(|| PrepError::Schema {
                split:  split.to_string(),
                column: name.clone(),
            })?;
            positions.insert(name.clone(), idx);
        }

        for name in &self.optional {
            if let Some(idx) = find(name) {
                positions.insert(name.clone(), idx);
            }
        }

        Ok(ColumnIndex { positions })
    }
}

/// Positions of the schema's columns that are present in one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnIndex {
    positions: BTreeMap<String, usize>,
}

impl ColumnIndex {
    /// Index of `column` in the header row, if the table has it.
    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    pub fn has(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    /// Value of `column` in `row`; `None` when the column is absent or the cell is missing.
    pub fn cell<'r>(&self, row: &'r [String], column: &str) -> Option<&'r str> {
        self.position(column)
            .and_then(|idx| row.get(idx))
            .map(String::as_str)
            .filter(|v| !is_missing(v))
    }
}

/// One row of a raw split, viewed through the interview schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord<'r> {
    pub question:         Option<&'r str>,
    pub interview_answer: Option<&'r str>,
    pub label:            Option<&'r str>,
    /// Every original cell, metadata included, in header order.
    pub fields:           &'r [String],
}

impl<'r> RawRecord<'r> {
    /// View `row` through `columns`; missing cells become `None`.
    pub fn from_row(columns: &ColumnIndex, row: &'r [String], label_column: &str) -> Self {
        Self {
            question:         columns.cell(row, QUESTION),
            interview_answer: columns.cell(row, INTERVIEW_ANSWER),
            label:            columns.cell(row, label_column),
            fields:           row,
        }
    }
}

/// The model-facing fields derived from one RawRecord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRecord {
    pub model_text: Option<String>,
    pub label_id:   Option<u32>,
}

impl ModelRecord {
    /// Whether this record survives filtering.
    pub fn is_complete(&self, labels_expected: bool) -> bool {
        self.model_text.is_some() && (!labels_expected || self.label_id.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_bind_reports_missing_required_column() {
        let schema = SplitSchema::interview("clarity_label");
        let err = schema
            .bind("validation", &headers(&["question", "title"]))
            .unwrap_err();
        match err {
            PrepError::Schema { split, column } => {
                assert_eq!(split, "validation");
                assert_eq!(column, "interview_answer");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_optional_column_may_be_absent() {
        let schema = SplitSchema::interview("clarity_label");
        let cols = schema
            .bind("test", &headers(&["interview_answer", "question"]))
            .unwrap();
        assert_eq!(cols.position("question"), Some(1));
        assert!(!cols.has("clarity_label"));
    }

    #[test]
    fn test_empty_cell_is_missing() {
        let schema = SplitSchema::interview("clarity_label");
        let cols = schema
            .bind("train", &headers(&["question", "interview_answer", "clarity_label"]))
            .unwrap();
        let row = headers(&["Q1", "", "Clear Reply"]);
        let rec = RawRecord::from_row(&cols, &row, "clarity_label");
        assert_eq!(rec.question, Some("Q1"));
        assert_eq!(rec.interview_answer, None);
        assert_eq!(rec.label, Some("Clear Reply"));
    }

    #[test]
    fn test_na_markers_are_missing() {
        let schema = SplitSchema::interview("clarity_label");
        let cols = schema
            .bind("train", &headers(&["question", "interview_answer", "clarity_label"]))
            .unwrap();

        for marker in ["NaN", "nan", "NA", "N/A", "null", "None", "#N/A", "<NA>"] {
            let row = headers(&[marker, "A1", marker]);
            let rec = RawRecord::from_row(&cols, &row, "clarity_label");
            assert_eq!(rec.question, None, "{marker} should be missing");
            assert_eq!(rec.label, None, "{marker} should be missing");
        }

        // Only exact markers count
        let row = headers(&[" NaN", "None of that", "Nancy"]);
        let rec = RawRecord::from_row(&cols, &row, "clarity_label");
        assert_eq!(rec.question, Some(" NaN"));
        assert_eq!(rec.interview_answer, Some("None of that"));
        assert_eq!(rec.label, Some("Nancy"));
    }

    #[test]
    fn test_completeness_rule() {
        let text_only = ModelRecord { model_text: Some("t".into()), label_id: None };
        assert!(text_only.is_complete(false));
        assert!(!text_only.is_complete(true));

        let neither = ModelRecord { model_text: None, label_id: None };
        assert!(!neither.is_complete(false));
    }
}
