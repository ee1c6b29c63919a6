use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use corpus_prep::{
    ChunkOutput, Chunker, OutputFormat, OverflowPolicy, Pipeline, PrepConfig, TokenizerKind,
    WordCleaner, corpus, load_tokenizer,
};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Filter and chunk sentence corpora for language-model training")]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, global = true, action = ArgAction::Count)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Drop low-quality sentences
    Clean {
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        cleaner: CleanerArgs,
    },
    /// Merge sentences into budget-sized chunks
    Chunk {
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        chunker: ChunkerArgs,
    },
    /// Clean, then chunk
    Run {
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        cleaner: CleanerArgs,
        #[command(flatten)]
        chunker: ChunkerArgs,
    },
}

#[derive(Args, Debug)]
struct IoArgs {
    /// Corpus file or directory (.txt one sentence per line, .jsonl with a `text` field)
    #[arg(short, long, value_name = "PATH")]
    input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Only use the first N sentences
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// JSON config file; flags override its values
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write a JSON run report
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Show progress bars
    #[arg(long)]
    progress: bool,
}

#[derive(Args, Debug)]
struct CleanerArgs {
    /// Letter-length score a sentence must exceed
    #[arg(long, value_name = "SCORE")]
    counting_avg: Option<f64>,

    /// Digit-word ratio a sentence must stay below
    #[arg(long, value_name = "RATIO")]
    number_ratio: Option<f64>,

    /// Sentences with fewer words skip the letter-length check
    #[arg(long, value_name = "WORDS")]
    short_word_threshold: Option<usize>,
}

#[derive(Args, Debug)]
struct ChunkerArgs {
    /// Word budget per chunk (disables token budgeting)
    #[arg(long, value_name = "WORDS")]
    seq_length: Option<usize>,

    /// Token budget per chunk
    #[arg(long, value_name = "TOKENS")]
    token_seq_length: Option<usize>,

    /// Chunk partitions in parallel (token budget only)
    #[arg(long, overrides_with = "no_parallelize")]
    parallelize: bool,

    /// Chunk sequentially even if the config enables parallelism
    #[arg(long, overrides_with = "parallelize")]
    no_parallelize: bool,

    /// Worker and partition count for --parallelize
    #[arg(long, value_name = "N")]
    cpu_count: Option<usize>,

    #[arg(long, value_enum)]
    overflow_policy: Option<OverflowPolicy>,

    /// Keep the unfinished chunk left after the last sentence
    #[arg(long, overrides_with = "no_flush_trailing")]
    flush_trailing: bool,

    /// Drop the unfinished chunk even if the config keeps it
    #[arg(long, overrides_with = "flush_trailing")]
    no_flush_trailing: bool,

    #[arg(long, value_enum, default_value_t = TokenizerKind::Whitespace)]
    tokenizer: TokenizerKind,

    /// tokenizer.json for --tokenizer huggingface
    #[arg(long, value_name = "PATH")]
    tokenizer_file: Option<PathBuf>,
}

impl CleanerArgs {
    fn apply(&self, config: &mut PrepConfig) {
        if let Some(value) = self.counting_avg {
            config.cleaner.counting_avg = value;
        }
        if let Some(value) = self.number_ratio {
            config.cleaner.number_ratio = value;
        }
        if let Some(value) = self.short_word_threshold {
            config.cleaner.short_word_threshold = value;
        }
    }
}

impl ChunkerArgs {
    fn apply(&self, config: &mut PrepConfig) {
        let chunker = &mut config.chunker;
        if self.seq_length.is_some() {
            chunker.seq_length = self.seq_length;
        }
        if self.token_seq_length.is_some() {
            chunker.token_seq_length = self.token_seq_length;
        }
        if let Some(value) = flag_pair(self.parallelize, self.no_parallelize) {
            chunker.parallelize = value;
        }
        if let Some(value) = self.cpu_count {
            chunker.cpu_count = value;
        }
        if let Some(value) = self.overflow_policy {
            chunker.overflow_policy = value;
        }
        if let Some(value) = flag_pair(self.flush_trailing, self.no_flush_trailing) {
            chunker.flush_trailing = value;
        }
    }

    fn tokenizer(&self, config: &PrepConfig) -> Result<Option<Arc<dyn corpus_prep::Tokenizer>>> {
        if !config.chunker.uses_tokens() {
            return Ok(None);
        }
        let tokenizer = load_tokenizer(self.tokenizer, self.tokenizer_file.as_deref())
            .context("Failed to load tokenizer")?;
        Ok(Some(tokenizer))
    }
}

/// `--x` / `--no-x`: `None` leaves the config value alone
fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Clean { io, cleaner } => run_clean(io, cleaner),
        Commands::Chunk { io, chunker } => run_chunk(io, chunker),
        Commands::Run {
            io,
            cleaner,
            chunker,
        } => run_pipeline(io, cleaner, chunker),
    }
}

fn init_logging(verbose: u8, quiet: u8) {
    let level = match (quiet, verbose) {
        (1, _) => "warn",
        (q, _) if q > 1 => "error",
        (_, 0) => "info",
        (_, 1) => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(io: &IoArgs) -> Result<PrepConfig> {
    let mut config = match &io.config {
        Some(path) => PrepConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => PrepConfig::default(),
    };
    if io.progress {
        config.show_progress = true;
    }
    Ok(config)
}

fn load_input(io: &IoArgs) -> Result<Vec<String>> {
    let sentences = corpus::read_sentences(&io.input)
        .with_context(|| format!("Failed to read corpus from {}", io.input.display()))?;
    Ok(corpus::truncate(sentences, io.limit))
}

fn run_clean(io: IoArgs, args: CleanerArgs) -> Result<()> {
    let mut config = load_config(&io)?;
    args.apply(&mut config);

    let cleaner = WordCleaner::new(config.cleaner)?.with_progress(config.show_progress);
    let sentences = load_input(&io)?;

    let start = Instant::now();
    let (cleaned, report) = cleaner.clean_with_report(&sentences);
    info!("✓ Filtering complete [{:.2}s]", start.elapsed().as_secs_f64());

    write_output(&io, &cleaned)?;
    write_report(io.report.as_deref(), &report)
}

fn run_chunk(io: IoArgs, args: ChunkerArgs) -> Result<()> {
    let mut config = load_config(&io)?;
    args.apply(&mut config);

    let tokenizer = args.tokenizer(&config)?;
    let chunker = Chunker::new(config.chunker, tokenizer)?.with_progress(config.show_progress);
    let sentences = load_input(&io)?;

    let start = Instant::now();
    let strategy = chunker.strategy_for(sentences.len());
    let output = chunker.chunk(&sentences)?;
    info!(
        "✓ Chunking complete with {} strategy [{:.2}s]",
        strategy,
        start.elapsed().as_secs_f64()
    );

    let report = ChunkReport {
        input: sentences.len(),
        strategy: strategy.to_string(),
        chunks: output_len(&output),
    };
    write_output(&io, &output.into_lines())?;
    write_report(io.report.as_deref(), &report)
}

fn run_pipeline(io: IoArgs, cleaner: CleanerArgs, chunker: ChunkerArgs) -> Result<()> {
    let mut config = load_config(&io)?;
    cleaner.apply(&mut config);
    chunker.apply(&mut config);

    let tokenizer = chunker.tokenizer(&config)?;
    let pipeline = Pipeline::new(config, tokenizer)?;
    let sentences = load_input(&io)?;

    let result = pipeline.run(&sentences)?;
    info!(
        "✓ Pipeline complete [clean {:.2}s, chunk {:.2}s]",
        result.report.clean_secs, result.report.chunk_secs
    );

    write_output(&io, &result.output.into_lines())?;
    write_report(io.report.as_deref(), &result.report)
}

#[derive(Serialize)]
struct ChunkReport {
    input: usize,
    strategy: String,
    chunks: usize,
}

fn output_len(output: &ChunkOutput) -> usize {
    output.chunks().map_or(1, |chunks| chunks.len())
}

fn write_output(io: &IoArgs, lines: &[String]) -> Result<()> {
    match &io.output {
        Some(path) => corpus::write_lines(path, lines, io.format)
            .with_context(|| format!("Failed to write output to {}", path.display())),
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            corpus::write_to(&mut handle, lines, io.format).context("Failed to write to stdout")?;
            handle.flush().context("Failed to flush stdout")
        }
    }
}

fn write_report<T: Serialize>(path: Option<&Path>, report: &T) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    info!("Report written to {}", path.display());
    Ok(())
}
