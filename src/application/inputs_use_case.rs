// ============================================================
// Layer 2 — InputsUseCase
// ============================================================
// Stage 2 of the pipeline:
//
//   Step 1: Load the persisted label mapping          (Layer 5 - infra)
//   Step 2: For each split, compose model_text, map
//           label ids, drop incomplete rows, save      (Layer 4 - data)
//
// The mapping is loaded, never rebuilt. A split whose raw file
// is missing is skipped and the next split still runs.

use anyhow::{Context, Result};

use crate::application::config::PrepConfig;
use crate::application::outcome::SplitOutcome;
use crate::data::processor::{SplitProcessor, SplitReport};
use crate::infra::label_store::LabelStore;

/// Stage 2: compose model text and map labels for every configured split.
pub struct InputsUseCase {
    config: PrepConfig,
}

impl InputsUseCase {
    pub fn new(config: PrepConfig) -> Self {
        Self { config }
    }

    /// Fails if the label mapping cannot be loaded; splits whose raw file
    /// is missing come back as `Skipped`.
    pub fn execute(&self) -> Result<Vec<SplitOutcome<SplitReport>>> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Load label mapping ────────────────────────────────────────
        let mapping = LabelStore::new(cfg.mapping_path()).load()?;
        tracing::info!("Loaded {} label mapping: {:?}", cfg.label_column, mapping.label2id);

        // ── Step 2: Process each split ────────────────────────────────────────
        let processor    = SplitProcessor::new(&mapping, cfg.label_column.as_str());
        let mut outcomes = Vec::with_capacity(cfg.splits.len());

        for split in &cfg.splits {
            let input  = cfg.raw_path(split);
            let output = cfg.processed_path(&split.name);

            match processor.process_file(&split.name, &input, &output) {
                Ok(report) => outcomes.push(SplitOutcome::Done(report)),
                Err(e) if e.is_skippable() => {
                    tracing::warn!("Skip {}: {}", split.name, e);
                    outcomes.push(SplitOutcome::Skipped {
                        split:  split.name.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to build model inputs for '{}'", split.name))
                }
            }
        }

        Ok(outcomes)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::SplitSpec;
    use crate::application::labels_use_case::LabelsUseCase;
    use crate::domain::error::PrepError;
    use std::{fs, path::Path};

    fn config(root: &Path) -> PrepConfig {
        PrepConfig {
            data_dir:      root.join("data").to_string_lossy().into_owned(),
            artifacts_dir: root.join("artifacts").to_string_lossy().into_owned(),
            splits:        vec![
                SplitSpec::new("train", "clarity_train.csv"),
                SplitSpec::new("validation", "clarity_validation.csv"),
                SplitSpec::new("test", "clarity_test.csv"),
            ],
            ..PrepConfig::default()
        }
    }

    fn write(root: &Path, file: &str, body: &str) {
        fs::create_dir_all(root.join("data")).unwrap();
        fs::write(root.join("data").join(file), body).unwrap();
    }

    #[test]
    fn test_missing_mapping_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "clarity_train.csv", "question,interview_answer,clarity_label\nQ,A,x\n");

        let err = InputsUseCase::new(config(dir.path())).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PrepError>(),
            Some(PrepError::MappingLoad { .. })
        ));
    }

    #[test]
    fn test_missing_split_skipped_siblings_processed() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        write(
            dir.path(),
            "clarity_train.csv",
            "question,interview_answer,clarity_label\nQ1,A1,clear\nQ2,A2,vague\n",
        );
        write(
            dir.path(),
            "clarity_test.csv",
            "question,interview_answer,clarity_label\nQ3,A3,clear\nQ4,A4,evasive\n",
        );
        LabelsUseCase::new(cfg.clone()).execute().unwrap();

        let outcomes = InputsUseCase::new(cfg.clone()).execute().unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].done().unwrap().rows_out, 2);
        assert!(outcomes[1].is_skipped());
        let test = outcomes[2].done().unwrap();
        assert_eq!((test.rows_in, test.rows_out, test.dropped), (2, 1, 1));

        assert!(cfg.processed_path("train").exists());
        assert!(!cfg.processed_path("validation").exists());
        assert!(cfg.processed_path("test").exists());
    }

    #[test]
    fn test_mapping_is_not_recomputed_from_other_splits() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        write(
            dir.path(),
            "clarity_train.csv",
            "question,interview_answer,clarity_label\nQ1,A1,b\n",
        );
        LabelsUseCase::new(cfg.clone()).execute().unwrap();

        // "a" would sort before "b" if the test split were used to rebuild ids
        write(
            dir.path(),
            "clarity_test.csv",
            "question,interview_answer,clarity_label\nQ2,A2,a\nQ3,A3,b\n",
        );
        InputsUseCase::new(cfg.clone()).execute().unwrap();

        let processed = fs::read_to_string(cfg.processed_path("test")).unwrap();
        assert!(processed.contains("Q3,A3,b,\"Question: Q3\nAnswer: A3\",0"));
        assert!(!processed.contains("Q2"));
    }

    #[test]
    fn test_schema_error_stops_the_stage() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        write(
            dir.path(),
            "clarity_train.csv",
            "question,interview_answer,clarity_label\nQ1,A1,clear\n",
        );
        LabelsUseCase::new(cfg.clone()).execute().unwrap();
        write(dir.path(), "clarity_validation.csv", "question,clarity_label\nQ,clear\n");

        let err = InputsUseCase::new(cfg.clone()).execute().unwrap_err();

        assert!(matches!(err.downcast_ref::<PrepError>(), Some(PrepError::Schema { .. })));
        // the split finished before the failure keeps its table
        assert!(cfg.processed_path("train").exists());
    }
}
