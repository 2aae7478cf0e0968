// ============================================================
// Layer 5 — Label Store
// ============================================================
// The persisted label mapping is the only source of label ids
// after the build-labels stage. Later stages load it; they never
// rebuild it from their own split, otherwise a validation split
// with a different label set would get different ids.
//
// File layout (artifacts/clarity_label_mapping.json):
//   {
//     "label2id": { "Ambivalent": 0, "Clear Reply": 1 },
//     "id2label": { "0": "Ambivalent", "1": "Clear Reply" }
//   }

use std::{fs, path::PathBuf};

use crate::domain::error::{PrepError, PrepResult};
use crate::domain::label_mapping::LabelMapping;
use crate::infra::artifact_writer::write_atomically;

/// JSON persistence for a LabelMapping.
pub struct LabelStore {
    path: PathBuf,
}

impl LabelStore {
    /// Store backed by the JSON file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Save both directions of the mapping as pretty JSON.
    pub fn save(&self, mapping: &LabelMapping) -> PrepResult<()> {
        write_atomically(&self.path, |out| {
            serde_json::to_writer_pretty(&mut *out, mapping)?;
            Ok(())
        })?;

        tracing::info!("Saved label mapping to '{}'", self.path.display());
        Ok(())
    }

    /// Load a mapping written by `save`.
    ///
    /// Any failure (missing file, bad JSON, broken bijection)
    /// is reported as `PrepError::MappingLoad`.
    pub fn load(&self) -> PrepResult<LabelMapping> {
        let fail = |reason: String| PrepError::MappingLoad {
            path: self.path.clone(),
            reason,
        };

        let json = fs::read_to_string(&self.path).map_err(|e| {
            fail(format!("{e}. Run 'build-labels' before this stage"))
        })?;

        let mapping: LabelMapping =
            serde_json::from_str(&json).map_err(|e| fail(e.to_string()))?;

        mapping.check_bijection().map_err(fail)?;

        tracing::debug!(
            "Loaded {} labels from '{}'",
            mapping.len(),
            self.path.display()
        );
        Ok(mapping)
    }
}
