// ============================================================
// Layer 2 — TokenizeUseCase
// ============================================================
// Stage 3 of the pipeline:
//
//   Step 1: Resolve the tokenization scheme           (Layer 5 - infra)
//   Step 2: For each processed split:
//             a. load the text and label columns      (Layer 4 - data)
//             b. encode every text in one call        (Layer 5 - infra)
//             c. attach integer label columns         (Layer 3 - domain)
//             d. write the artifact                   (Layer 5 - infra)
//
// An unresolvable scheme stops the stage before any split is
// touched. A missing processed split is skipped.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::config::PrepConfig;
use crate::application::outcome::SplitOutcome;
use crate::data::loader::{load_split, SplitTable};
use crate::domain::error::PrepError;
use crate::domain::record::SplitSchema;
use crate::domain::tokenized::TokenizedBatch;
use crate::domain::traits::{SchemeResolver, TextEncoder};
use crate::infra::artifact_writer::ArtifactWriter;

/// Raw label columns whose distribution is reported for the training split.
const REPORTED_LABELS: [&str; 2] = ["clarity_label", "evasion_label"];

/// What the tokenize stage produced for one split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizeReport {
    pub split:    String,
    pub rows:     usize,
    /// Padded sequence width
    pub width:    usize,
    /// Label columns stored next to the ids, sorted by name
    pub labels:   Vec<String>,
    pub artifact: PathBuf,
}

/// Stage 3: encode each processed split and write its artifact.
pub struct TokenizeUseCase {
    config:   PrepConfig,
    resolver: Box<dyn SchemeResolver>,
}

impl TokenizeUseCase {
    /// `resolver` turns `config.model_name` into an encoder.
    pub fn new(config: PrepConfig, resolver: impl SchemeResolver + 'static) -> Self {
        Self { config, resolver: Box::new(resolver) }
    }

    pub fn execute(&self) -> Result<Vec<SplitOutcome<TokenizeReport>>> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Resolve the scheme ────────────────────────────────────────
        let encoder = self.resolver.resolve(&cfg.model_name)?;

        let writer = ArtifactWriter::new(cfg.tokenized_dir());
        let mut schema = SplitSchema::encoded(&cfg.text_column, &cfg.label_columns);
        schema.optional.extend(REPORTED_LABELS.iter().map(|c| c.to_string()));

        // ── Step 2: Encode each split ─────────────────────────────────────────
        let mut outcomes = Vec::with_capacity(cfg.splits.len());

        for split in &cfg.splits {
            let path = cfg.processed_path(&split.name);
            tracing::info!("=== Processing {} split ===", split.name);

            let table = match load_split(&split.name, &path, &schema) {
                Ok(table) => table,
                Err(e) if e.is_skippable() => {
                    tracing::warn!("Skip {}: {}", split.name, e);
                    outcomes.push(SplitOutcome::Skipped {
                        split:  split.name.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to load '{}' for tokenization", split.name))
                }
            };

            let report = self
                .encode_split(&table, encoder.as_ref(), &writer)
                .with_context(|| format!("Failed to tokenize '{}'", split.name))?;
            outcomes.push(SplitOutcome::Done(report));
        }

        Ok(outcomes)
    }

    fn encode_split(
        &self,
        table:   &SplitTable,
        encoder: &dyn TextEncoder,
        writer:  &ArtifactWriter,
    ) -> Result<TokenizeReport> {
        let cfg = &self.config;

        // ── a. Texts (missing cells encode as "") ─────────────────────────────
        let texts: Vec<String> = table
            .column_values(&cfg.text_column)
            .map(|v| v.unwrap_or_default().to_string())
            .collect();

        // ── b. Encode ─────────────────────────────────────────────────────────
        let encoded = encoder.encode(&texts, cfg.max_length)?;
        tracing::info!(
            "[{}] Tokenization done: input_ids [{} x {}], attention_mask [{} x {}]",
            table.split,
            encoded.rows(),
            encoded.width(),
            encoded.rows(),
            encoded.width()
        );

        if table.split == cfg.training_split {
            log_label_distribution(table);
        }

        // ── c. Label columns ──────────────────────────────────────────────────
        let mut artifact = TokenizedBatch::new(&cfg.model_name, cfg.max_length, encoded);
        for column in &cfg.label_columns {
            if !table.columns.has(column) {
                tracing::debug!("[{}] No '{}' column, not stored", table.split, column);
                continue;
            }
            let values = integer_column(table, column)?;
            artifact = artifact
                .with_labels(column.as_str(), values)
                .map_err(anyhow::Error::msg)?;
        }

        // ── d. Write ──────────────────────────────────────────────────────────
        let path = writer.write(&table.split, &artifact)?;
        let (rows, width) = artifact.shape();

        Ok(TokenizeReport {
            split: table.split.clone(),
            rows,
            width,
            labels: artifact.labels.keys().cloned().collect(),
            artifact: path,
        })
    }
}

/// Parse an integer label column; `"2.0"` style cells are accepted as `2`.
fn integer_column(table: &SplitTable, column: &str) -> Result<Vec<i64>, PrepError> {
    table
        .column_values(column)
        .enumerate()
        .map(|(i, cell)| {
            let raw = cell.unwrap_or_default();
            parse_integer(raw).ok_or_else(|| PrepError::InvalidLabelValue {
                split:  table.split.clone(),
                column: column.to_string(),
                row:    i + 1,
                value:  raw.to_string(),
            })
        })
        .collect()
}

fn parse_integer(raw: &str) -> Option<i64> {
    if let Ok(v) = raw.parse::<i64>() {
        return Some(v);
    }
    let f = raw.parse::<f64>().ok()?;
    (f.is_finite() && f.fract() == 0.0).then(|| f as i64)
}

fn log_label_distribution(table: &SplitTable) {
    for column in REPORTED_LABELS {
        if !table.columns.has(column) {
            continue;
        }
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for value in table.column_values(column) {
            *counts.entry(value.unwrap_or("<missing>")).or_insert(0) += 1;
        }
        tracing::info!("[{}] {} value counts:", table.split, column);
        for (value, n) in counts {
            tracing::info!("    {:<24} {}", value, n);
        }
    }
}
