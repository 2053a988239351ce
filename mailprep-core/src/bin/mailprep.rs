//! mailprep command-line tool
//!
//! Loads an email dataset, reports on it, splits it and runs the text
//! preprocessor over it.
//!
//! ## Usage
//!
//! ```bash
//! # Dataset composition (synthesizes a sample if the file is missing)
//! mailprep explore --data data/emails.csv
//!
//! # Stratified 80/20 split with a fixed seed
//! mailprep split --test-size 0.2 --seed 42
//!
//! # Preprocess ad-hoc texts, or three built-in emails when none are given
//! mailprep preprocess "You have WON \$1000! Click here NOW"
//!
//! # Throughput of each pipeline stage over the dataset texts
//! mailprep --log-level warn bench --runs 10
//! ```

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mailprep_core::analyzer::cleaner;
use mailprep_core::{
    validate, DatasetConfig, DatasetLoader, EmailDataset, Label, TextPreprocessor,
    WordTokenizer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const WARMUP_RUNS: usize = 1;

const SAMPLE_EMAILS: [&str; 3] = [
    "You have WON $1000! Click here NOW to claim your PRIZE!!!",
    "Hi John, let's meet tomorrow at 2pm to discuss the project",
    "URGENT: Your account has been compromised. Update password NOW!",
];

#[derive(Parser)]
#[command(name = "mailprep")]
#[command(about = "Spam/ham email dataset preparation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print dataset statistics
    Explore {
        /// CSV file with id, email_subject, email_body, label columns
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// Split the dataset and print partition sizes
    Split {
        /// CSV file with id, email_subject, email_body, label columns
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Proportion of rows held out for testing
        #[arg(short, long)]
        test_size: Option<f64>,

        /// Shuffle seed
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Preprocess texts and show validation stats
    Preprocess {
        /// Texts to preprocess; built-in sample emails are used when empty
        texts: Vec<String>,
    },

    /// Measure preprocessing throughput over the dataset texts
    Bench {
        /// CSV file with id, email_subject, email_body, label columns
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Measured runs per stage
        #[arg(short, long, default_value = "5")]
        runs: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .with_context(|| format!("invalid log level: {}", cli.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Explore { data } => explore(config(data, None, None)),
        Commands::Split {
            data,
            test_size,
            seed,
        } => split(config(data, test_size, seed)),
        Commands::Preprocess { texts } => {
            preprocess(&texts);
            Ok(())
        }
        Commands::Bench { data, runs } => bench(config(data, None, None), runs.max(1)),
    }
}

fn config(data: Option<PathBuf>, test_size: Option<f64>, seed: Option<u64>) -> DatasetConfig {
    let defaults = DatasetConfig::default();
    DatasetConfig {
        path: data.unwrap_or(defaults.path),
        test_size: test_size.unwrap_or(defaults.test_size),
        seed: seed.unwrap_or(defaults.seed),
    }
}

fn load(config: DatasetConfig) -> Result<EmailDataset> {
    let path = config.path.clone();
    DatasetLoader::new(config)
        .load()
        .with_context(|| format!("failed to load dataset from {}", path.display()))
}

fn explore(config: DatasetConfig) -> Result<()> {
    let stats = load(config)?.explore();

    println!("=== Dataset ===");
    println!("--------------------------------");
    println!("Emails      : {}", stats.total_emails);
    println!("Spam        : {} ({:.1}%)", stats.spam_count, stats.spam_percentage);
    println!("Ham         : {} ({:.1}%)", stats.ham_count, stats.ham_percentage);
    println!("Columns     : {}", stats.columns.join(", "));
    for (column, missing) in &stats.missing_values {
        println!("Missing     : {column} = {missing}");
    }
    println!("--------------------------------");
    Ok(())
}

fn split(config: DatasetConfig) -> Result<()> {
    let (test_size, seed) = (config.test_size, config.seed);
    let split = load(config)?
        .split(test_size, seed)
        .context("failed to split dataset")?;

    let balance = |labels: &[Label]| {
        Label::ALL
            .iter()
            .map(|l| format!("{l}={}", labels.iter().filter(|x| *x == l).count()))
            .collect::<Vec<_>>()
            .join(" ")
    };

    println!("=== Split (test_size={test_size}, seed={seed}) ===");
    println!("--------------------------------");
    println!("Train       : {} [{}]", split.train_len(), balance(&split.train_labels));
    println!("Test        : {} [{}]", split.test_len(), balance(&split.test_labels));
    println!("--------------------------------");
    Ok(())
}

fn preprocess(texts: &[String]) {
    let pre = TextPreprocessor::default();
    let inputs: Vec<&str> = if texts.is_empty() {
        SAMPLE_EMAILS.to_vec()
    } else {
        texts.iter().map(String::as_str).collect()
    };

    info!(num_texts = inputs.len(), "Text preprocessing demo");
    for text in inputs {
        let processed = pre.preprocess(text);
        let stats = validate(text, &processed);
        println!("Original    : {text}");
        println!("Processed   : {processed}");
        println!("Stats       : {stats}\n");
    }
}

fn bench(config: DatasetConfig, runs: usize) -> Result<()> {
    let dataset = load(config)?;
    let texts: Vec<String> = dataset.texts().into_iter().flatten().collect();
    let skipped = dataset.len() - texts.len();
    let workload = Workload {
        texts: texts.len(),
        bytes: texts.iter().map(String::len).sum(),
    };
    let pre = TextPreprocessor::default();

    println!("Texts:     {} ({skipped} without text skipped)", group_digits(workload.texts));
    println!("Size:      {}", fmt_bytes(workload.bytes));
    println!("Runs:      {runs} (+{WARMUP_RUNS} warmup)\n");

    if texts.is_empty() {
        println!("Nothing to measure.");
        return Ok(());
    }

    let cleaned: Vec<String> = texts.iter().map(|t| cleaner::clean(t)).collect();

    let timing = time_runs(runs, || {
        for text in &texts {
            std::hint::black_box(cleaner::clean(text));
        }
        0
    });
    report("clean", &workload, &timing);

    let timing = time_runs(runs, || {
        cleaned
            .iter()
            .map(|text| pre.tokenizer().tokenize(text).len())
            .sum()
    });
    report("tokenize", &workload, &timing);

    let timing = time_runs(runs, || {
        pre.preprocess_batch(&texts)
            .iter()
            .filter(|out| !out.is_empty())
            .map(|out| out.split(' ').count())
            .sum()
    });
    report("preprocess", &workload, &timing);

    Ok(())
}

/// Size of one pass over the dataset.
struct Workload {
    texts: usize,
    bytes: usize,
}

/// Wall-clock results of repeated passes.
struct Timing {
    mean: Duration,
    best: Duration,
    /// Tokens emitted by the last pass; zero for stages that do not tokenize.
    tokens: usize,
}

/// Runs `pass` after a warmup and keeps the mean and fastest durations.
fn time_runs<F: FnMut() -> usize>(runs: usize, mut pass: F) -> Timing {
    for _ in 0..WARMUP_RUNS {
        std::hint::black_box(pass());
    }

    let mut total = Duration::ZERO;
    let mut best = Duration::MAX;
    let mut tokens = 0;
    for _ in 0..runs {
        let start = Instant::now();
        tokens = std::hint::black_box(pass());
        let elapsed = start.elapsed();
        total += elapsed;
        best = best.min(elapsed);
    }

    Timing {
        mean: total / runs as u32,
        best,
        tokens,
    }
}

fn report(stage: &str, workload: &Workload, timing: &Timing) {
    let secs = timing.mean.as_secs_f64().max(f64::EPSILON);
    let per_text_us = secs * 1e6 / workload.texts as f64;
    let mib_per_sec = workload.bytes as f64 / (1024.0 * 1024.0) / secs;

    println!("[{stage}]");
    println!(
        "  mean        : {:.3} ms (best {:.3} ms)",
        secs * 1e3,
        timing.best.as_secs_f64() * 1e3
    );
    println!("  per text    : {per_text_us:.2} µs");
    println!("  texts/sec   : {}", group_digits((workload.texts as f64 / secs) as usize));
    println!("  throughput  : {mib_per_sec:.2} MiB/s");
    if timing.tokens > 0 {
        println!(
            "  tokens      : {} ({:.1} per text)",
            group_digits(timing.tokens),
            timing.tokens as f64 / workload.texts as f64
        );
    }
    println!();
}

fn fmt_bytes(bytes: usize) -> String {
    const UNITS: [&str; 3] = ["B", "KiB", "MiB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}

/// Formats `n` with `_` between groups of three digits.
fn group_digits(n: usize) -> String {
    let digits = n.to_string();
    let lead = digits.len() % 3;

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            out.push('_');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_digits_in_threes() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1000), "1_000");
        assert_eq!(group_digits(1234567), "1_234_567");
        assert_eq!(group_digits(12345), "12_345");
    }

    #[test]
    fn formats_byte_sizes() {
        assert_eq!(fmt_bytes(512), "512 B");
        assert_eq!(fmt_bytes(2048), "2.00 KiB");
        assert_eq!(fmt_bytes(3 * 1024 * 1024), "3.00 MiB");
    }

    #[test]
    fn timing_keeps_best_and_last_tokens() {
        let mut calls = 0;
        let timing = time_runs(3, || {
            calls += 1;
            calls
        });
        assert_eq!(calls, 3 + WARMUP_RUNS);
        assert_eq!(timing.tokens, calls);
        assert!(timing.best <= timing.mean);
    }

    #[test]
    fn cli_parses_subcommands() {
        let args = ["mailprep", "--log-level", "warn", "split", "-t", "0.3", "-s", "7"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.log_level, "warn");
        match cli.command {
            Commands::Split { data, test_size, seed } => {
                assert_eq!(data, None);
                assert_eq!(test_size, Some(0.3));
                assert_eq!(seed, Some(7));
            }
            _ => panic!("expected split"),
        }

        let cli = Cli::try_parse_from(["mailprep", "bench"]).unwrap();
        assert!(matches!(cli.command, Commands::Bench { runs: 5, .. }));
    }

    #[test]
    fn flags_override_config_defaults() {
        let config = config(Some(PathBuf::from("x.csv")), None, Some(9));
        assert_eq!(config.path, PathBuf::from("x.csv"));
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.seed, 9);
    }
}
