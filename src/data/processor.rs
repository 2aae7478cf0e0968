// ============================================================
// Layer 4 — Split Processor
// ============================================================
// Turns one raw split into the table the tokenize stage reads.
//
// For every row:
//   model_text = TextComposer(question, interview_answer)
//   label_id   = mapping[label]   (only if the split has the label column)
//
// Drop rule:
//   drop if model_text is missing
//        OR (split has the label column AND label_id is missing)
//
// A label the training split never produced has no id, so the
// row is dropped rather than raising.
//
// Output columns:
//   <original columns…>, model_text[, label_id]
// An input that already carries model_text / label_id has
// those columns replaced, not duplicated.

use std::path::{Path, PathBuf};

use crate::data::composer::TextComposer;
use crate::data::loader::{load_split, save_table, SplitTable};
use crate::domain::error::PrepResult;
use crate::domain::label_mapping::LabelMapping;
use crate::domain::record::{ModelRecord, RawRecord, SplitSchema, LABEL_ID, MODEL_TEXT};

/// The rows of one split that survived filtering.
#[derive(Debug, Clone)]
pub struct FilteredSplitTable {
    pub split:           String,
    /// Input headers minus any old derived columns, then `model_text`
    /// and, when labels are expected, `label_id`.
    pub headers:         Vec<String>,
    pub rows:            Vec<Vec<String>>,
    pub rows_in:         usize,
    /// Whether the split carried the label column.
    pub labels_expected: bool,
    pub missing_text:    usize,
    /// Rows with text whose label was missing or unseen in training.
    pub missing_label:   usize,
}

impl FilteredSplitTable {
    /// Rows removed; each dropped row is counted once.
    pub fn dropped(&self) -> usize {
        self.rows_in - self.rows.len()
    }
}

/// Counts reported after a split has been processed and saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitReport {
    pub split:    String,
    pub rows_in:  usize,
    pub rows_out: usize,
    pub dropped:  usize,
    /// Where the processed CSV was written.
    pub output:   PathBuf,
}

/// Turns raw splits into model-ready tables using a fixed label mapping.
pub struct SplitProcessor<'m> {
    mapping:      &'m LabelMapping,
    label_column: String,
    composer:     TextComposer,
}

impl<'m> SplitProcessor<'m> {
    /// `label_column` names the raw label; its ids come from `mapping`.
    pub fn new(mapping: &'m LabelMapping, label_column: impl Into<String>) -> Self {
        Self {
            mapping,
            label_column: label_column.into(),
            composer: TextComposer::new(),
        }
    }

    /// Schema every raw split must satisfy.
    pub fn schema(&self) -> SplitSchema {
        SplitSchema::interview(&self.label_column)
    }

    /// Derive the model-facing fields of one record.
    pub fn model_record(&self, record: &RawRecord<'_>, labels_expected: bool) -> ModelRecord {
        ModelRecord {
            model_text: self.composer.compose_record(record),
            label_id:   if labels_expected {
                self.mapping.id_of(record.label)
            } else {
                None
            },
        }
    }

    /// Compose, map, and filter an already-loaded split.
    ///
    /// A row is kept when its text can be composed and, if the split has
    /// the label column, its label maps to an id. Metadata columns are
    /// carried through unchanged.
    pub fn process(&self, table: &SplitTable) -> FilteredSplitTable {
        let labels_expected = table.columns.has(&self.label_column);

        // Existing derived columns are replaced
        let kept: Vec<usize> = table
            .headers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.as_str() != MODEL_TEXT && h.as_str() != LABEL_ID)
            .map(|(i, _)| i)
            .collect();

        let mut headers: Vec<String> = kept.iter().map(|&i| table.headers[i].clone()).collect();
        headers.push(MODEL_TEXT.to_string());
        if labels_expected {
            headers.push(LABEL_ID.to_string());
        }

        let mut rows          = Vec::with_capacity(table.len());
        let mut missing_text  = 0usize;
        let mut missing_label = 0usize;

        for record in table.raw_records(&self.label_column) {
            let model = self.model_record(&record, labels_expected);

            if !model.is_complete(labels_expected) {
                // Attribute each drop to exactly one reason
                if model.model_text.is_none() {
                    missing_text += 1;
                } else {
                    missing_label += 1;
                }
                continue;
            }

            let mut row: Vec<String> = kept
                .iter()
                .map(|&i| record.fields.get(i).cloned().unwrap_or_default())
                .collect();
            row.push(model.model_text.unwrap_or_default());
            if let Some(id) = model.label_id {
                row.push(id.to_string());
            }
            rows.push(row);
        }

        FilteredSplitTable {
            split: table.split.clone(),
            headers,
            rows,
            rows_in: table.len(),
            labels_expected,
            missing_text,
            missing_label,
        }
    }

    /// Load `input`, process it, and save the result to `output`.
    pub fn process_file(&self, split: &str, input: &Path, output: &Path) -> PrepResult<SplitReport> {
        let table    = load_split(split, input, &self.schema())?;
        let filtered = self.process(&table);

        if filtered.labels_expected {
            tracing::info!(
                "[{}] Dropped {} rows with missing text/labels ({} missing text, {} unmapped or missing label)",
                filtered.split,
                filtered.dropped(),
                filtered.missing_text,
                filtered.missing_label
            );
        } else {
            tracing::info!(
                "[{}] No '{}' column, keeping rows without {} ({} dropped for missing text)",
                filtered.split,
                self.label_column,
                LABEL_ID,
                filtered.dropped()
            );
        }

        let text_idx = filtered.headers.len() - if filtered.labels_expected { 2 } else { 1 };
        for row in filtered.rows.iter().take(3) {
            tracing::debug!(
                "[{}] sample: model_text={:?} label_id={:?}",
                filtered.split,
                row[text_idx],
                filtered.labels_expected.then(|| &row[text_idx + 1])
            );
        }

        save_table(output, &filtered.headers, &filtered.rows)?;
        tracing::info!("[{}] Saved processed split to '{}'", filtered.split, output.display());

        Ok(SplitReport {
            split:    filtered.split.clone(),
            rows_in:  filtered.rows_in,
            rows_out: filtered.rows.len(),
            dropped:  filtered.dropped(),
            output:   output.to_path_buf(),
        })
    }
}
