// ============================================================
// Layer 2 — LabelsUseCase
// ============================================================
// Stage 1 of the pipeline:
//
//   Step 1: Load the training split's label column   (Layer 4 - data)
//   Step 2: Build the sorted label vocabulary        (Layer 3 - domain)
//   Step 3: Persist the mapping                      (Layer 5 - infra)
//
// Only the training split is read. Missing label cells are
// skipped; a missing label column stops the stage.

use anyhow::{Context, Result};

use crate::application::config::PrepConfig;
use crate::data::loader::load_split;
use crate::domain::label_mapping::LabelMapping;
use crate::domain::record::SplitSchema;
use crate::infra::label_store::LabelStore;

/// Stage 1: build the label vocabulary from the training split.
pub struct LabelsUseCase {
    config: PrepConfig,
}

impl LabelsUseCase {
    pub fn new(config: PrepConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<LabelMapping> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Load the training split ───────────────────────────────────
        let train = cfg.training()?;
        let path  = cfg.raw_path(train);
        tracing::info!("Loading train data from '{}'", path.display());

        let table = load_split(&train.name, &path, &SplitSchema::labelled(&cfg.label_column))
            .with_context(|| format!("Cannot build the '{}' vocabulary", cfg.label_column))?;

        // ── Step 2: Build the vocabulary ──────────────────────────────────────
        let mapping = LabelMapping::from_labels(table.column_values(&cfg.label_column));

        if mapping.is_empty() {
            tracing::warn!(
                "[{}] Column '{}' has no non-missing values; the mapping is empty",
                train.name,
                cfg.label_column
            );
        }
        for (label, id) in &mapping.label2id {
            tracing::info!("  {:?} → {}", label, id);
        }

        // ── Step 3: Persist ───────────────────────────────────────────────────
        LabelStore::new(cfg.mapping_path()).save(&mapping)?;

        Ok(mapping)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::SplitSpec;
    use crate::domain::error::PrepError;
    use std::{fs, path::Path};

    fn config(root: &Path) -> PrepConfig {
        PrepConfig {
            data_dir:      root.join("data").to_string_lossy().into_owned(),
            artifacts_dir: root.join("artifacts").to_string_lossy().into_owned(),
            splits:        vec![SplitSpec::new("train", "clarity_train.csv")],
            ..PrepConfig::default()
        }
    }

    fn write_train(root: &Path, body: &str) {
        fs::create_dir_all(root.join("data")).unwrap();
        fs::write(root.join("data").join("clarity_train.csv"), body).unwrap();
    }

    #[test]
    fn test_builds_and_persists_mapping() {
        let dir = tempfile::tempdir().unwrap();
        write_train(
            dir.path(),
            "question,interview_answer,clarity_label\n\
             Is the sky blue?,yes,clear\n\
             Is water wet?,yes,clear\n",
        );
        let cfg = config(dir.path());

        let mapping = LabelsUseCase::new(cfg.clone()).execute().unwrap();

        assert_eq!(mapping.label2id.len(), 1);
        assert_eq!(mapping.label2id["clear"], 0);
        assert_eq!(LabelStore::new(cfg.mapping_path()).load().unwrap(), mapping);
    }

    #[test]
    fn test_deterministic_under_row_reordering() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        write_train(a.path(), "clarity_label\nClear Reply\nAmbivalent\n\nClear Non-Reply\n");
        write_train(b.path(), "clarity_label\nClear Non-Reply\nClear Reply\nAmbivalent\nAmbivalent\n");

        let ma = LabelsUseCase::new(config(a.path())).execute().unwrap();
        let mb = LabelsUseCase::new(config(b.path())).execute().unwrap();

        assert_eq!(ma, mb);
        assert_eq!(ma.label2id["Ambivalent"], 0);
        assert_eq!(ma.label2id["Clear Non-Reply"], 1);
        assert_eq!(ma.label2id["Clear Reply"], 2);
    }

    #[test]
    fn test_na_markers_are_not_labels() {
        let dir = tempfile::tempdir().unwrap();
        write_train(
            dir.path(),
            "question,interview_answer,clarity_label\n\
             Q1,A1,Clear Reply\n\
             Q2,A2,NaN\n\
             Q3,A3,N/A\n\
             Q4,A4,Ambivalent\n",
        );

        let mapping = LabelsUseCase::new(config(dir.path())).execute().unwrap();

        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.id_of(Some("NaN")), None);
        assert_eq!(mapping.label_of(0), Some("Ambivalent"));
        assert_eq!(mapping.label_of(1), Some("Clear Reply"));
    }

    #[test]
    fn test_missing_label_column_is_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        write_train(dir.path(), "question,interview_answer\nQ,A\n");
        let cfg = config(dir.path());

        let err = LabelsUseCase::new(cfg.clone()).execute().unwrap_err();

        assert!(matches!(err.downcast_ref::<PrepError>(), Some(PrepError::Schema { .. })));
        assert!(!cfg.mapping_path().exists());
    }

    #[test]
    fn test_missing_training_split_stops_the_stage() {
        let dir = tempfile::tempdir().unwrap();
        let err = LabelsUseCase::new(config(dir.path())).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PrepError>(),
            Some(PrepError::MissingSplit { .. })
        ));
    }
}
