// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// One subcommand per pipeline stage, plus `run` for all three.
// Every subcommand takes the same flags, which become the
// PrepConfig handed to the application layer.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::config::{PrepConfig, SplitSpec};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the label mapping from the training split
    BuildLabels(PrepArgs),

    /// Build model_text + label_id tables for every split
    BuildInputs(PrepArgs),

    /// Tokenize every processed split into one artifact per split
    Tokenize(PrepArgs),

    /// Run build-labels, build-inputs, and tokenize in order
    Run(PrepArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PrepArgs {
    /// Tokenization scheme: hub id, tokenizer.json path, or a directory containing one
    #[arg(long, default_value = "bert-base-uncased")]
    pub model_name: String,

    /// Maximum number of tokens kept per text
    #[arg(long, default_value_t = 256)]
    pub max_length: usize,

    /// Directory with raw splits; processed and tokenized outputs go here too
    #[arg(long, default_value = "data")]
    pub data_dir: String,

    /// Directory for the label mapping
    #[arg(long, default_value = "artifacts")]
    pub artifacts_dir: String,

    /// Label column to build the vocabulary from
    #[arg(long, default_value = "clarity_label")]
    pub label_column: String,

    /// Name of the split the vocabulary is built from
    #[arg(long, default_value = "train")]
    pub training_split: String,

    /// Split to process as NAME=FILE (repeatable); defaults to
    /// train=clarity_train.csv and validation=clarity_test.csv
    #[arg(long = "split", value_name = "NAME=FILE")]
    pub splits: Vec<SplitSpec>,

    /// Column of the processed split to tokenize
    #[arg(long, default_value = "model_text")]
    pub text_column: String,

    /// Integer columns to store in the tokenized artifact
    #[arg(long, value_delimiter = ',', default_value = "label_id")]
    pub label_columns: Vec<String>,
}

/// The application layer never sees clap types.
impl From<PrepArgs> for PrepConfig {
    fn from(a: PrepArgs) -> Self {
        let splits = if a.splits.is_empty() {
            PrepConfig::default().splits
        } else {
            a.splits
        };

        PrepConfig {
            model_name:     a.model_name,
            max_length:     a.max_length,
            data_dir:       a.data_dir,
            artifacts_dir:  a.artifacts_dir,
            label_column:   a.label_column,
            training_split: a.training_split,
            splits,
            text_column:    a.text_column,
            label_columns:  a.label_columns,
        }
    }
}
