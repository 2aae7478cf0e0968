// ============================================================
// Layer 5 — Infrastructure Layer
// ============================================================
// Everything that touches a file format or an outside library:
//
//   label_store.rs     — Label mapping persistence
//                        Writes label2id / id2label as JSON once,
//                        and loads (never rebuilds) it for every
//                        later stage.
//
//   tokenizer_store.rs — Tokenization scheme resolution
//                        Loads a Hugging Face tokenizer from a
//                        local tokenizer.json or the hub and wraps
//                        it as a TextEncoder.
//
//   artifact_writer.rs — Tokenized artifact output
//                        One self-describing JSON file per split,
//                        written atomically.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling)

/// Label mapping save / load
pub mod label_store;

/// Tokenizer resolution and the Hugging Face TextEncoder
pub mod tokenizer_store;

/// Per-split tokenized artifact output
pub mod artifact_writer;
