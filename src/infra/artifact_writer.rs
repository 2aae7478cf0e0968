// ============================================================
// Layer 5 — Artifact Writer
// ============================================================
// Persists one TokenizedBatch per split.
//
// File naming convention:
//   data/tokenized/
//     train_tokenized.json
//     validation_tokenized.json
//
// The writer is only called once the whole batch for a split
// is in memory, and the file appears via rename, so a reader
// never sees a half-written artifact.
//
// Reference: serde_json crate documentation
//            tempfile crate documentation

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::domain::error::{PrepError, PrepResult};
use crate::domain::tokenized::TokenizedBatch;

/// Writes tokenized splits under one output directory.
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    /// The directory is created on first write, not here.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Where the artifact for `split` lives.
    pub fn artifact_path(&self, split: &str) -> PathBuf {
        self.dir.join(format!("{split}_tokenized.json"))
    }

    /// Write the artifact for `split`, creating the output directory if absent.
    pub fn write(&self, split: &str, artifact: &TokenizedBatch) -> PrepResult<PathBuf> {
        let path = self.artifact_path(split);

        write_atomically(&path, |out| {
            serde_json::to_writer(&mut *out, artifact)?;
            Ok(())
        })?;

        let (rows, width) = artifact.shape();
        tracing::info!(
            "[{}] Saved tokenized tensors [{} x {}] to '{}'",
            split,
            rows,
            width,
            path.display()
        );
        Ok(path)
    }

    /// Read an artifact back.
    #[cfg(test)]
    pub fn read(path: &Path) -> PrepResult<TokenizedBatch> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }
}

/// Write to a temp file beside `path`, then rename it into place.
pub fn write_atomically<F>(path: &Path, write: F) -> PrepResult<()>
where
    F: FnOnce(&mut BufWriter<&File>) -> PrepResult<()>,
{
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    // Like `mkdir -p`: fine if it already exists
    fs::create_dir_all(dir)?;

    let tmp = NamedTempFile::new_in(dir)?;
    {
        let mut out = BufWriter::new(tmp.as_file());
        write(&mut out)?;
        out.flush()?;
    }
    tmp.persist(path).map_err(|e| PrepError::Io(e.error))?;
    Ok(())
}
