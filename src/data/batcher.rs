// ============================================================
// Layer 4 — Sequence Batcher
// ============================================================
// Stacks variable-length token sequences into two rectangular
// tables of shape [N, W]:
//
//   input_ids:      real ids followed by pad_id
//   attention_mask: 1 for every real id, 0 for every pad
//
// Steps (in order):
//   1. truncate each sequence to max_length
//   2. W = length of the longest truncated sequence
//   3. right-pad every sequence to W
//
// So W never exceeds max_length, and a batch whose longest
// text is short stays narrow.

use crate::domain::tokenized::EncodedBatch;

/// Truncates and pads token sequences into one rectangular batch.
pub struct Batcher {
    pad_id:     u32,
    max_length: usize,
}

impl Batcher {
    pub fn new(pad_id: u32, max_length: usize) -> Self {
        Self { pad_id, max_length }
    }

    /// Truncate each sequence to `max_length`, then pad all of them with
    /// `pad_id` to the longest remaining one. Mask is 1 for real tokens.
    pub fn batch(&self, sequences: Vec<Vec<u32>>) -> EncodedBatch {
        // ── Step 1: Truncate ──────────────────────────────────────────────────
        let sequences: Vec<Vec<u32>> = sequences
            .into_iter()
            .map(|mut ids| {
                ids.truncate(self.max_length);
                ids
            })
            .collect();

        // ── Step 2: Batch width ───────────────────────────────────────────────
        let width = sequences.iter().map(Vec::len).max().unwrap_or(0);

        // ── Step 3: Pad ───────────────────────────────────────────────────────
        let mut input_ids      = Vec::with_capacity(sequences.len());
        let mut attention_mask = Vec::with_capacity(sequences.len());

        for mut ids in sequences {
            let real = ids.len();
            let mut mask = vec![1u32; real];

            ids.resize(width, self.pad_id);
            mask.resize(width, 0);

            input_ids.push(ids);
            attention_mask.push(mask);
        }

        tracing::debug!(
            "Batched {} sequences to width {} (max_length {})",
            input_ids.len(),
            width,
            self.max_length
        );

        EncodedBatch { input_ids, attention_mask }
    }
}
