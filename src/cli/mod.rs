// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and routes each subcommand to
// its use case. Nothing here touches files directly.
//
//   build-labels  → LabelsUseCase
//   build-inputs  → InputsUseCase
//   tokenize      → TokenizeUseCase
//   run           → all three, in order

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PrepArgs};

use crate::application::{
    config::PrepConfig,
    inputs_use_case::InputsUseCase,
    labels_use_case::LabelsUseCase,
    outcome::SplitOutcome,
    tokenize_use_case::TokenizeUseCase,
};
use crate::infra::tokenizer_store::TokenizerStore;

#[derive(Parser, Debug)]
#[command(
    name = "clarity-prep",
    version,
    about = "Prepare the clarity dataset for a text classifier: labels, model text, tokenized tensors."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::BuildLabels(args) => run_labels(args.into()),
            Commands::BuildInputs(args) => run_inputs(args.into()),
            Commands::Tokenize(args)    => run_tokenize(args.into()),
            Commands::Run(args)         => run_all(args),
        }
    }
}

fn run_labels(config: PrepConfig) -> Result<()> {
    let mapping = LabelsUseCase::new(config.clone()).execute()?;
    println!(
        "Built {} labels -> {}",
        mapping.len(),
        config.mapping_path().display()
    );
    Ok(())
}

fn run_inputs(config: PrepConfig) -> Result<()> {
    let outcomes = InputsUseCase::new(config).execute()?;
    print_outcomes(&outcomes, |r| {
        format!(
            "[{}] {} rows in, {} dropped, {} kept -> {}",
            r.split,
            r.rows_in,
            r.dropped,
            r.rows_out,
            r.output.display()
        )
    });
    Ok(())
}

fn run_tokenize(config: PrepConfig) -> Result<()> {
    let outcomes = TokenizeUseCase::new(config, TokenizerStore::new()).execute()?;
    print_outcomes(&outcomes, |r| {
        let labels = if r.labels.is_empty() {
            "no labels".to_string()
        } else {
            r.labels.join(", ")
        };
        format!(
            "[{}] [{} x {}] ({}) -> {}",
            r.split,
            r.rows,
            r.width,
            labels,
            r.artifact.display()
        )
    });
    Ok(())
}

/// One line per split, then a tally.
fn print_outcomes<R>(outcomes: &[SplitOutcome<R>], line: impl Fn(&R) -> String) {
    for outcome in outcomes {
        match outcome {
            SplitOutcome::Done(report) => println!("{}", line(report)),
            SplitOutcome::Skipped { split, reason } => println!("[{split}] skipped: {reason}"),
        }
    }

    let written = outcomes.iter().filter_map(SplitOutcome::done).count();
    let skipped = outcomes.iter().filter(|o| o.is_skipped()).count();
    println!("{written} written, {skipped} skipped");
}

fn run_all(args: PrepArgs) -> Result<()> {
    let config: PrepConfig = args.into();

    tracing::info!("Step 1/3: label mapping");
    run_labels(config.clone())?;

    tracing::info!("Step 2/3: model inputs");
    run_inputs(config.clone())?;

    tracing::info!("Step 3/3: tokenization");
    run_tokenize(config)
}
