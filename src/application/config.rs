// ============================================================
// Layer 2 — Preparation Configuration
// ============================================================
// Everything a stage needs to know, passed in explicitly.
// Serialisable so a run's settings can be written out or
// loaded alongside its artifacts.
//
// Derived locations (defaults):
//   data/clarity_train.csv                   raw split
//   data/clarity_train_for_model.csv         processed split
//   artifacts/clarity_label_mapping.json     label mapping
//   data/tokenized/train_tokenized.json      tokenized artifact

use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::{Path, PathBuf}, str::FromStr};

use crate::domain::error::{PrepError, PrepResult};
use crate::domain::record::{LABEL_ID, MODEL_TEXT};

// ─── SplitSpec ────────────────────────────────────────────────────────────────
/// A named split and its raw CSV file name inside `data_dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSpec {
    pub name: String,
    pub file: String,
}

impl SplitSpec {
    /// `file` is relative to the configured `data_dir`.
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self { name: name.into(), file: file.into() }
    }
}

/// Parses `NAME=FILE`, e.g. `validation=clarity_test.csv`.
impl FromStr for SplitSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, file)) if !name.is_empty() && !file.is_empty() => {
                Ok(Self::new(name, file))
            }
            _ => Err(format!("expected NAME=FILE, got '{s}'")),
        }
    }
}

// ─── PrepConfig ───────────────────────────────────────────────────────────────
/// Settings shared by every stage of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepConfig {
    /// Tokenization scheme: hub id, tokenizer.json path, or directory
    pub model_name:     String,
    /// Truncation ceiling in tokens
    pub max_length:     usize,
    /// Raw splits, processed splits and tokenized artifacts live here
    pub data_dir:       String,
    /// Label mapping output directory
    pub artifacts_dir:  String,
    /// The one label taxonomy in use for this run
    pub label_column:   String,
    /// Split the label vocabulary is built from
    pub training_split: String,
    pub splits:         Vec<SplitSpec>,
    /// Column of the processed split that gets tokenized
    pub text_column:    String,
    /// Integer columns copied into each tokenized artifact
    pub label_columns:  Vec<String>,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            model_name:     "bert-base-uncased".to_string(),
            max_length:     256,
            data_dir:       "data".to_string(),
            artifacts_dir:  "artifacts".to_string(),
            label_column:   "clarity_label".to_string(),
            training_split: "train".to_string(),
            splits:         vec![
                SplitSpec::new("train", "clarity_train.csv"),
                SplitSpec::new("validation", "clarity_test.csv"),
            ],
            text_column:    MODEL_TEXT.to_string(),
            label_columns:  vec![LABEL_ID.to_string()],
        }
    }
}

impl PrepConfig {
    /// Reject settings no stage can run with.
    pub fn validate(&self) -> PrepResult<()> {
        if self.max_length == 0 {
            return Err(PrepError::Config("max_length must be greater than 0".into()));
        }
        if self.splits.is_empty() {
            return Err(PrepError::Config("at least one split is required".into()));
        }

        let mut seen = HashSet::new();
        for split in &self.splits {
            if !seen.insert(split.name.as_str()) {
                return Err(PrepError::Config(format!("split '{}' is listed twice", split.name)));
            }
        }

        self.training()?;
        Ok(())
    }

    /// The split the label vocabulary comes from.
    pub fn training(&self) -> PrepResult<&SplitSpec> {
        self.splits
            .iter()
            .find(|s| s.name == self.training_split)
            .ok_or_else(|| {
                PrepError::Config(format!(
                    "training split '{}' is not among the configured splits",
                    self.training_split
                ))
            })
    }

    /// Raw CSV of a split.
    pub fn raw_path(&self, split: &SplitSpec) -> PathBuf {
        Path::new(&self.data_dir).join(&split.file)
    }

    /// Processed CSV written by build-inputs, e.g.
    /// `data/clarity_validation_for_model.csv`.
    pub fn processed_path(&self, split: &str) -> PathBuf {
        Path::new(&self.data_dir).join(format!("clarity_{split}_for_model.csv"))
    }

    /// Label mapping JSON, named after the label column.
    pub fn mapping_path(&self) -> PathBuf {
        Path::new(&self.artifacts_dir).join(format!("{}_mapping.json", self.label_column))
    }

    /// Directory holding one tokenized artifact per split.
    pub fn tokenized_dir(&self) -> PathBuf {
        Path::new(&self.data_dir).join("tokenized")
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locations() {
        let cfg = PrepConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.mapping_path(), Path::new("artifacts/clarity_label_mapping.json"));
        assert_eq!(cfg.raw_path(&cfg.splits[1]), Path::new("data/clarity_test.csv"));
        assert_eq!(
            cfg.processed_path("validation"),
            Path::new("data/clarity_validation_for_model.csv")
        );
        assert_eq!(cfg.tokenized_dir(), Path::new("data/tokenized"));
    }

    #[test]
    fn test_split_spec_parsing() {
        assert_eq!(
            "test=clarity_test.csv".parse::<SplitSpec>().unwrap(),
            SplitSpec::new("test", "clarity_test.csv")
        );
        assert!("test".parse::<SplitSpec>().is_err());
        assert!("=x.csv".parse::<SplitSpec>().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let zero = PrepConfig { max_length: 0, ..PrepConfig::default() };
        assert!(matches!(zero.validate(), Err(PrepError::Config(_))));

        let no_train = PrepConfig {
            splits: vec![SplitSpec::new("test", "clarity_test.csv")],
            ..PrepConfig::default()
        };
        assert!(no_train.validate().is_err());

        let dup = PrepConfig {
            splits: vec![
                SplitSpec::new("train", "a.csv"),
                SplitSpec::new("train", "b.csv"),
            ],
            ..PrepConfig::default()
        };
        assert!(dup.validate().is_err());
    }

    #[test]
    fn test_config_serialises() {
        let cfg = PrepConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: PrepConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
