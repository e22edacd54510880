// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap and hands every command to Layer 2 (application).
// Results are printed here and nowhere else.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{BatchArgs, Commands, CorpusArgs, PlotArgs, VocabArgs};

use corpus_batcher::application::{
    batch_use_case::BatchUseCase,
    plot_use_case::plot_csv,
    prepare_use_case::{CorpusConfig, PrepareUseCase},
};

#[derive(Parser, Debug)]
#[command(
    name = "corpus-batcher",
    version,
    about = "Turn a directory of text files into next-word training batches."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case. The CLI only routes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Vocab(args)   => run_vocab(args),
            Commands::Stats(args)   => run_stats(args),
            Commands::Batches(args) => run_batches(args),
            Commands::Plot(args)    => run_plot(args),
        }
    }
}

fn run_vocab(args: VocabArgs) -> Result<()> {
    let use_case = PrepareUseCase::new(CorpusConfig::try_from(args.corpus)?);
    let reader   = use_case.reader()?;
    let vocab    = use_case.vocabulary(&reader, args.refit)?;

    println!("Vocabulary: {} words", vocab.vocab_size());
    Ok(())
}

fn run_stats(args: CorpusArgs) -> Result<()> {
    let use_case = PrepareUseCase::new(CorpusConfig::try_from(args)?);
    let reader   = use_case.reader()?;
    let vocab    = use_case.vocabulary(&reader, false)?;
    let report   = use_case.report(&reader, &vocab)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_batches(args: BatchArgs) -> Result<()> {
    let count      = args.count;
    let max_length = args.max_length;
    let config     = CorpusConfig::try_from(args)?;

    tracing::info!("Batching corpus in: {}", config.corpus_dir);
    let summary = BatchUseCase::new(config, count, max_length).execute()?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run_plot(args: PlotArgs) -> Result<()> {
    match plot_csv(&args.csv, &args.name, &args.figures_dir)? {
        Some(path) => println!("Figure written to {}", path.display()),
        None       => println!("Nothing drawn: too many curves in {}", args.csv),
    }
    Ok(())
}
