// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits describing what the pipeline
// works with: label vocabularies, records, encoded batches,
// and the capabilities the infrastructure layer provides.
//
// Rules for this layer:
//   - NO file I/O
//   - NO tokenizer library types
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Typed error taxonomy shared by every stage
pub mod error;

// Bijective label ↔ id vocabulary
pub mod label_mapping;

// Raw and model-facing records, plus the per-split schema
pub mod record;

// Encoded batches and the persisted tokenized artifact
pub mod tokenized;

// Capabilities implemented by the infrastructure layer
pub mod traits;
