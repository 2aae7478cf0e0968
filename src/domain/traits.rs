// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The pipeline needs a subword tokenizer but should not care
// which library provides it. Two small traits describe the
// capability:
//
//   SchemeResolver::resolve("bert-base-uncased")  → TextEncoder
//   TextEncoder::encode(texts, max_length)        → EncodedBatch
//
// Implementations:
//   - TokenizerStore / HfTextEncoder (infra) → Hugging Face tokenizers
//   - test doubles in the application tests
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use crate::domain::error::PrepResult;
use crate::domain::tokenized::EncodedBatch;

// ─── SchemeResolver ───────────────────────────────────────────────────────────
/// Turns a tokenization-scheme identifier into a ready encoder.
pub trait SchemeResolver {
    /// Fails with `PrepError::SchemeUnavailable` when the scheme cannot be found.
    fn resolve(&self, scheme_id: &str) -> PrepResult<Box<dyn TextEncoder>>;
}

// ─── TextEncoder ──────────────────────────────────────────────────────────────
/// Encodes a whole split in one call.
///
/// Contract:
///   - texts longer than `max_length` tokens are truncated to exactly `max_length`
///   - every row is right-padded to the longest row of this call
///   - identical text always yields identical ids
pub trait TextEncoder {
    fn encode(&self, texts: &[String], max_length: usize) -> PrepResult<EncodedBatch>;
}
