// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// One use case per pipeline stage. Stages hand work to each
// other only through persisted artifacts:
//
//   LabelsUseCase    raw train split       → label mapping JSON
//   InputsUseCase    mapping + raw splits  → processed split CSVs
//   TokenizeUseCase  processed split CSVs  → tokenized JSON per split
//
// Rules for this layer:
//   - No CSV parsing or tokenizer calls here (Layers 4 and 5)
//   - Decide which errors skip a split and which stop the stage
//   - Every stage receives an explicit PrepConfig

// Run configuration and derived file locations
pub mod config;

// Per-split result shared by the stages
pub mod outcome;

// Stage 1: label vocabulary
pub mod labels_use_case;

// Stage 2: model text + label ids
pub mod inputs_use_case;

// Stage 3: tokenization
pub mod tokenize_use_case;
