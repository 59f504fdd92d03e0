mod fallback;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use supporter_core::{
    dedup_entries, export_failed, load_entries, save_entries, self_consistency,
    EmbeddingProvider, EvalReport, HashEmbeddingProvider, Matcher, MatcherConfig, QuestionField,
    WordVectorProvider, DEFAULT_EMBEDDING_DIM,
};
use tracing_subscriber::EnvFilter;

use crate::fallback::{ChatHistory, FallbackClient, DEFAULT_ANSWER};

#[derive(Debug, Parser)]
#[command(name = "supporter")]
#[command(about = "FAQ supporter matching and evaluation CLI")]
struct Cli {
    /// Path to a word-vector model file (word2vec text format). Without it
    /// the deterministic hash embedder is used.
    #[arg(long, global = true)]
    vectors: Option<PathBuf>,

    /// JSON file with matcher thresholds; individual flags override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Answer a single question against the corpus
    Ask {
        #[arg(long)]
        corpus: PathBuf,
        #[arg(long)]
        question: String,
        #[arg(long)]
        keyword_threshold: Option<usize>,
        #[arg(long)]
        token_threshold: Option<usize>,
        #[arg(long)]
        similarity_threshold: Option<f32>,
        /// Consult the conversational fallback service when nothing matches
        #[arg(long, default_value_t = false)]
        fallback: bool,
        /// Printed when nothing matches and the fallback is off or fails
        #[arg(long, default_value = DEFAULT_ANSWER)]
        default_answer: String,
    },
    /// Replay every corpus question through the matcher and measure accuracy
    Eval {
        #[arg(long)]
        corpus: PathBuf,
        /// Which question field to use as the synthetic query
        #[arg(long, default_value = "canonical")]
        field: QuestionField,
        #[arg(long)]
        keyword_threshold: Option<usize>,
        #[arg(long)]
        token_threshold: Option<usize>,
        #[arg(long)]
        similarity_threshold: Option<f32>,
        /// Write the full report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Drop duplicate entries, keeping the first occurrence
    Dedup {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Field whose value identifies duplicates
        #[arg(long, default_value = "canonical")]
        field: QuestionField,
    },
    /// Copy the entries named by a failed-id list into a separate file
    ExportFailed {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Comma-separated entry ids
        #[arg(long, value_delimiter = ',')]
        ids: Vec<u64>,
        /// Read the failed ids from an eval report JSON instead
        #[arg(long, conflicts_with = "ids")]
        report: Option<PathBuf>,
    },
}

fn make_embedder(vectors: Option<&Path>) -> Result<(Box<dyn EmbeddingProvider>, String)> {
    match vectors {
        Some(path) => {
            eprintln!("Loading word vectors from {} ...", path.display());
            let provider = WordVectorProvider::load(path)
                .with_context(|| format!("load word vectors from {}", path.display()))?;
            eprintln!("Loaded {} vectors (dim {}).", provider.len(), provider.dim());
            let name = path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok((Box::new(provider), name))
        }
        None => Ok((
            Box::new(HashEmbeddingProvider::new(DEFAULT_EMBEDDING_DIM)),
            "hash".to_string(),
        )),
    }
}

fn resolve_config(
    base: Option<&Path>,
    keyword_threshold: Option<usize>,
    token_threshold: Option<usize>,
    similarity_threshold: Option<f32>,
) -> Result<MatcherConfig> {
    let mut config = match base {
        Some(path) => MatcherConfig::from_file(path)
            .with_context(|| format!("load config from {}", path.display()))?,
        None => MatcherConfig::default(),
    };

    if let Some(value) = keyword_threshold {
        config.keyword_threshold = value;
    }
    if let Some(value) = token_threshold {
        config.token_threshold = value;
    }
    if let Some(value) = similarity_threshold {
        config.similarity_threshold = value;
    }

    config.validate().context("validate thresholds")?;
    Ok(config)
}

fn read_report(path: &Path) -> Result<EvalReport> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).context("parse eval report json")
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Ask {
            corpus,
            question,
            keyword_threshold,
            token_threshold,
            similarity_threshold,
            fallback,
            default_answer,
        } => {
            let config = resolve_config(
                cli.config.as_deref(),
                *keyword_threshold,
                *token_threshold,
                *similarity_threshold,
            )?;
            let (embedder, model_name) = make_embedder(cli.vectors.as_deref())?;
            let matcher = Matcher::open(corpus, embedder, config);

            let outcome = matcher.answer(question)?;
            println!(
                "model={} decision={:?} score={:.4} entry_id={}",
                model_name,
                outcome.decision,
                outcome.score,
                outcome
                    .entry_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "null".to_string())
            );

            match outcome.answer {
                Some(answer) => println!("answer={answer}"),
                None if *fallback => {
                    let client = FallbackClient::from_env(default_answer.clone());
                    let mut history = ChatHistory::new();
                    println!("answer={}", client.complete(&mut history, question));
                }
                None => println!("answer={default_answer}"),
            }
        }
        Commands::Eval {
            corpus,
            field,
            keyword_threshold,
            token_threshold,
            similarity_threshold,
            report,
        } => {
            let config = resolve_config(
                cli.config.as_deref(),
                *keyword_threshold,
                *token_threshold,
                *similarity_threshold,
            )?;
            let (embedder, model_name) = make_embedder(cli.vectors.as_deref())?;
            let matcher = Matcher::open(corpus, embedder, config);

            let summary = self_consistency(&matcher, *field)?;

            for outcome in &summary.outcomes {
                println!(
                    "case={} passed={} decision={:?} matched_id={} score={:.4} latency={:.1}ms",
                    outcome.entry_id,
                    outcome.passed,
                    outcome.decision,
                    outcome
                        .matched_id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "null".to_string()),
                    outcome.score,
                    outcome.latency_ms
                );
            }

            println!(
                "run_id={} model={} field={} total={} passed={} failed={} accuracy={:.4}",
                summary.run_id,
                model_name,
                summary.field,
                summary.total,
                summary.passed,
                summary.failed_ids.len(),
                summary.accuracy
            );
            println!("failed_ids={:?}", summary.failed_ids);

            let total_ms: f64 = summary.outcomes.iter().map(|o| o.latency_ms).sum();
            let avg_ms = total_ms / summary.outcomes.len().max(1) as f64;
            println!("total_latency={total_ms:.1}ms avg_latency={avg_ms:.1}ms");

            if let Some(path) = report {
                let file =
                    File::create(path).with_context(|| format!("create {}", path.display()))?;
                serde_json::to_writer_pretty(file, &summary).context("serialize eval report")?;
                println!("report={}", path.display());
            }

            if summary.total > 0 && summary.failed_ids.is_empty() {
                tracing::info!("corpus is fully self-consistent");
            }
        }
        Commands::Dedup {
            input,
            output,
            field,
        } => {
            let entries = load_entries(input)
                .with_context(|| format!("load corpus from {}", input.display()))?;
            let before = entries.len();
            let deduped = dedup_entries(entries, *field);
            save_entries(output, &deduped)
                .with_context(|| format!("write corpus to {}", output.display()))?;
            println!(
                "field={} input={} kept={} dropped={} output={}",
                field,
                before,
                deduped.len(),
                before - deduped.len(),
                output.display()
            );
        }
        Commands::ExportFailed {
            input,
            output,
            ids,
            report,
        } => {
            let failed_ids: Vec<u64> = match report {
                Some(path) => read_report(path)?.failed_ids,
                None => ids.clone(),
            };
            anyhow::ensure!(
                !failed_ids.is_empty(),
                "no failed ids given (use --ids or --report)"
            );

            let entries = load_entries(input)
                .with_context(|| format!("load corpus from {}", input.display()))?;
            let failed = export_failed(&entries, &failed_ids);
            save_entries(output, &failed)
                .with_context(|| format!("write corpus to {}", output.display()))?;
            println!(
                "requested={} exported={} output={}",
                failed_ids.len(),
                failed.len(),
                output.display()
            );
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
