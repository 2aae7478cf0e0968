// ============================================================
// Layer 5 — Tokenizer Store
// ============================================================
// Resolves a tokenization scheme identifier into a TextEncoder
// backed by the Hugging Face `tokenizers` crate.
//
// Resolution order:
//   1. a directory containing tokenizer.json
//   2. a tokenizer.json file path
//   3. a hub identifier such as "bert-base-uncased"
//      (downloaded and cached by the `http` feature)
//
// Any failure is SchemeUnavailable; nothing can be encoded
// without a tokenizer, so the tokenize stage stops.
//
// Encoding applies right-truncation at max_length inside the
// tokenizer (so special tokens are kept), then hands the ids to
// the Batcher for batch-longest padding.

use std::path::{Path, PathBuf};

use tokenizers::{PostProcessor, Tokenizer, TruncationParams};

use crate::data::batcher::Batcher;
use crate::domain::error::{PrepError, PrepResult};
use crate::domain::tokenized::EncodedBatch;
use crate::domain::traits::{SchemeResolver, TextEncoder};

/// Resolves scheme identifiers to Hugging Face tokenizers.
/// Stateless: hub downloads are cached by `tokenizers` itself.
pub struct TokenizerStore;

impl TokenizerStore {
    /// Create a new TokenizerStore
    pub fn new() -> Self {
        Self
    }

    /// Load the tokenizer for `scheme_id`.
    ///
    /// Local paths are tried first so offline runs never touch
    /// the network; anything else is treated as a hub identifier.
    pub fn load(&self, scheme_id: &str) -> PrepResult<Tokenizer> {
        let unavailable = |reason: String| PrepError::SchemeUnavailable {
            scheme: scheme_id.to_string(),
            reason,
        };

        if let Some(file) = local_tokenizer_file(scheme_id) {
            if !file.is_file() {
                return Err(unavailable(format!("'{}' does not exist", file.display())));
            }
            tracing::info!("Loading tokenizer from '{}'", file.display());
            return Tokenizer::from_file(&file).map_err(|e| unavailable(e.to_string()));
        }

        tracing::info!("Initializing tokenizer: {}", scheme_id);
        Tokenizer::from_pretrained(scheme_id, None).map_err(|e| unavailable(e.to_string()))
    }
}

impl Default for TokenizerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemeResolver for TokenizerStore {
    fn resolve(&self, scheme_id: &str) -> PrepResult<Box<dyn TextEncoder>> {
        let encoder = HfTextEncoder::new(self.load(scheme_id)?);
        tracing::debug!(
            "Scheme '{}' ready: pad id {}, {} special tokens per text",
            scheme_id,
            encoder.pad_id(),
            encoder.special_tokens()
        );
        Ok(Box::new(encoder))
    }
}

/// The local file a scheme id refers to, or `None` for a hub identifier.
fn local_tokenizer_file(scheme_id: &str) -> Option<PathBuf> {
    let path = Path::new(scheme_id);
    if path.is_dir() {
        Some(path.join("tokenizer.json"))
    } else if path.is_file() || scheme_id.ends_with(".json") {
        Some(path.to_path_buf())
    } else {
        None
    }
}

// ─── HfTextEncoder ────────────────────────────────────────────────────────────
/// TextEncoder over a loaded Hugging Face tokenizer.
pub struct HfTextEncoder {
    /// Template tokenizer; cloned per call so its own truncation
    /// and padding settings are never mutated
    tokenizer: Tokenizer,
    /// Id written into padding positions
    pad_id:    u32,
}

impl HfTextEncoder {
    /// Wrap a tokenizer, picking its pad id once.
    pub fn new(tokenizer: Tokenizer) -> Self {
        // Prefer the scheme's own padding config, then its [PAD] token
        let pad_id = tokenizer
            .get_padding()
            .map(|p| p.pad_id)
            .or_else(|| tokenizer.token_to_id("[PAD]"))
            .unwrap_or(0);
        Self { tokenizer, pad_id }
    }

    /// Id used for padding positions.
    pub fn pad_id(&self) -> u32 {
        self.pad_id
    }

    /// Special tokens the scheme adds to a single text, e.g. 2 for
    /// BERT's [CLS] … [SEP].
    pub fn special_tokens(&self) -> usize {
        self.tokenizer
            .get_post_processor()
            .map_or(0, |p| p.added_tokens(false))
    }
}

impl TextEncoder for HfTextEncoder {
    fn encode(&self, texts: &[String], max_length: usize) -> PrepResult<EncodedBatch> {
        // The tokenizer subtracts the special tokens from max_length
        let special = self.special_tokens();
        if special > 0 && max_length <= special {
            return Err(PrepError::Config(format!(
                "max_length {max_length} leaves no room for text after the {special} special tokens the scheme adds"
            )));
        }

        let mut tokenizer = self.tokenizer.clone();

        // Padding is the Batcher's job
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| PrepError::Tokenization(e.to_string()))?;

        let encodings = tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| PrepError::Tokenization(e.to_string()))?;

        let sequences = encodings
            .iter()
            .map(|enc| enc.get_ids().to_vec())
            .collect();

        Ok(Batcher::new(self.pad_id, max_length).batch(sequences))
    }
}

// ─── Test Fixtures ────────────────────────────────────────────────────────────
/// Write a lower-casing, whitespace-split WordLevel tokenizer to `dir`.
///
/// Ids: [PAD]=0, [UNK]=1, then `words` in order from 2. No special
/// tokens are added around a text.
#[cfg(test)]
pub(crate) fn word_level_fixture(dir: &Path, words: &[&str]) -> PathBuf {
    write_fixture(dir, &["[PAD]", "[UNK]"], words, serde_json::Value::Null)
}

/// Same as `word_level_fixture`, but wraps every text as
/// [CLS] … [SEP] the way BERT schemes do.
///
/// Ids: [PAD]=0, [UNK]=1, [CLS]=2, [SEP]=3, then `words` from 4.
#[cfg(test)]
pub(crate) fn bert_style_fixture(dir: &Path, words: &[&str]) -> PathBuf {
    let post_processor = serde_json::json!({
        "type": "BertProcessing",
        "sep": ["[SEP]", 3],
        "cls": ["[CLS]", 2]
    });
    write_fixture(dir, &["[PAD]", "[UNK]", "[CLS]", "[SEP]"], words, post_processor)
}

#[cfg(test)]
fn write_fixture(
    dir:            &Path,
    specials:       &[&str],
    words:          &[&str],
    post_processor: serde_json::Value,
) -> PathBuf {
    let mut vocab = serde_json::json!({});
    let mut added_tokens = Vec::new();
    for (id, token) in specials.iter().enumerate() {
        vocab[*token] = serde_json::json!(id);
        added_tokens.push(serde_json::json!({
            "id": id, "content": token, "single_word": false, "lstrip": false,
            "rstrip": false, "normalized": false, "special": true
        }));
    }
    for (i, word) in words.iter().enumerate() {
        vocab[*word] = serde_json::json!(i + specials.len());
    }

    let tokenizer_json = serde_json::json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": added_tokens,
        "normalizer": {
            "type": "BertNormalizer",
            "clean_text": true,
            "handle_chinese_chars": true,
            "strip_accents": null,
            "lowercase": true
        },
        "pre_tokenizer": { "type": "Whitespace" },
        "post_processor": post_processor,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": vocab,
            "unk_token": "[UNK]"
        }
    });

    let path = dir.join("tokenizer.json");
    std::fs::write(&path, serde_json::to_string_pretty(&tokenizer_json).unwrap()).unwrap();
    path
}
