// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between a raw CSV split and padded id tables.
//
//   clarity_{split}.csv
//       │
//       ▼
//   loader            → reads the CSV, checks the split schema
//       │
//       ▼
//   composer          → "Question: …\nAnswer: …" model text
//       │
//       ▼
//   processor         → label ids, drop incomplete rows, save table
//       │
//       ▼
//   TextEncoder       → token ids (infra layer)
//       │
//       ▼
//   batcher           → truncate + right-pad to the batch width
//
// Each module is responsible for exactly one step.

/// Loads and saves split tables as CSV
pub mod loader;

/// Builds the model-facing text field
pub mod composer;

/// Applies the label mapping and filters a split
pub mod processor;

/// Truncates and pads token sequences into an EncodedBatch
pub mod batcher;
