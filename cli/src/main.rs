use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use reco_core::indexer::{run_indexing, TopicPredictor, TOPIC_LIMIT};
use reco_core::score::recommend;
use reco_core::store::TopicStore;
use reco_predictor::{HttpPredictor, PredictorConfig};
use tracing_subscriber::{fmt, EnvFilter};

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Parser)]
#[command(name = "reco")]
#[command(about = "Index documents by predicted topics and recommend similar ones", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PredictorArgs {
    /// Prediction service host
    #[arg(long)]
    host: String,
    /// Prediction service port
    #[arg(long)]
    port: Option<u16>,
    /// Prediction service API key
    #[arg(long)]
    api_key: String,
    /// Use TLS on prediction calls
    #[arg(long, default_value_t = false)]
    tls: bool,
    /// Prediction request timeout in seconds
    #[arg(long, default_value_t = 12)]
    timeout_secs: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict topics for every reference in a source file and build the index
    Index {
        /// Source list of references to index, one per line
        #[arg(long)]
        source: String,
        /// Index directory
        #[arg(long, default_value = "./reco_index")]
        index: String,
        /// Flush any existing index before indexing
        #[arg(long, default_value_t = false)]
        flush: bool,
        /// Number of topics requested per prediction
        #[arg(long, default_value_t = TOPIC_LIMIT)]
        topics: usize,
        #[command(flatten)]
        predictor: PredictorArgs,
    },
    /// Recommend indexed documents topically similar to a reference
    Recommend {
        /// Reference to get recommendations for
        reference: String,
        /// Index directory
        #[arg(long, default_value = "./reco_index")]
        index: String,
        /// Number of topics requested for the query prediction
        #[arg(long, default_value_t = TOPIC_LIMIT)]
        topics: usize,
        #[command(flatten)]
        predictor: PredictorArgs,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Index { source, index, flush, topics, predictor } => {
            run_index(&source, &index, flush, topics, &predictor)
        }
        Commands::Recommend { reference, index, topics, predictor } => {
            run_recommend(&reference, &index, topics, &predictor)
        }
    }
}

fn build_predictor(args: &PredictorArgs) -> Result<HttpPredictor> {
    let config = PredictorConfig {
        host: args.host.clone(),
        port: args.port,
        api_key: args.api_key.clone(),
        use_tls: args.tls,
        timeout_secs: args.timeout_secs,
    };
    HttpPredictor::new(&config).context("invalid predictor configuration")
}

fn run_index(source: &str, index: &str, flush: bool, topics: usize, args: &PredictorArgs) -> Result<()> {
    let predictor = build_predictor(args)?;
    if flush {
        TopicStore::flush(index)?;
    }
    let mut store = TopicStore::create(index)?;
    let references = read_references(source)
        .with_context(|| format!("failed to read source list {source}"))?;

    let report = run_indexing(&mut store, &predictor, &references, topics)?;
    tracing::info!(
        indexed = report.indexed,
        failed = report.failed.len(),
        index,
        "index build complete"
    );
    Ok(())
}

fn run_recommend(reference: &str, index: &str, topics: usize, args: &PredictorArgs) -> Result<()> {
    let predictor = build_predictor(args)?;
    let store = TopicStore::open(index)?;
    // The query has no batch to fall back on: a failed prediction is fatal.
    let prediction = predictor.predict(reference, topics)?;

    for r in recommend(&store, &prediction.topics)? {
        println!("{:.6} {} {}", r.score, r.uri, r.title);
    }
    Ok(())
}

/// Read a newline-delimited reference list, skipping blanks and comments.
fn read_references<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let mut references = Vec::new();
    for line in BufReader::new(File::open(path)?).lines() {
        let line = line?.trim().to_string();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        references.push(line);
    }
    Ok(references)
}
