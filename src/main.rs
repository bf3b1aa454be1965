// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use hybrid_rag::utils::logging::{format_info, format_score, format_success, format_warning};
use hybrid_rag::{
    AnswerExporter, Config, ConsoleRenderer, DatasetLoader, EmbeddingProvider,
    HttpEmbeddingClient, HttpGenerationClient, NullSink, QueryEvent, QueryOrchestrator,
    QuerySettings, RetrievalEngine, Validator,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "hybrid_rag")]
#[command(version = "0.1.0")]
#[command(
    about = "Hybrid lexical/semantic retrieval with streamed, source-grounded answers",
    long_about = None
)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a question from the retrieved sources, streaming the output
    Ask {
        question: String,

        /// Semantic weight in [0, 1]; the lexical signal gets the remainder
        #[arg(short, long)]
        weight: Option<f32>,

        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Directory to write the answer as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long)]
        pretty: bool,
    },

    /// Rank the corpus against a query without generating
    Search {
        query: String,

        #[arg(short, long)]
        weight: Option<f32>,

        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Load and index the dataset, then print index statistics
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    colored::control::set_override(cli.color);
    hybrid_rag::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::default_config()
    };

    match cli.command {
        Commands::Ask {
            question,
            weight,
            top_k,
            output,
            pretty,
        } => {
            cmd_ask(&config, &question, weight, top_k, output, pretty, cli.color).await?;
        }
        Commands::Search {
            query,
            weight,
            top_k,
        } => {
            cmd_search(&config, &query, weight, top_k).await?;
        }
        Commands::Stats => {
            cmd_stats(&config).await?;
        }
    }

    Ok(())
}

async fn load_documents(config: &Config) -> Result<Vec<hybrid_rag::Document>> {
    let loader = DatasetLoader::new(&config.dataset);
    loader
        .load()
        .await
        .with_context(|| format!("Failed to load dataset from {}", loader.source()))
}

async fn cmd_ask(
    config: &Config,
    question: &str,
    weight: Option<f32>,
    top_k: Option<usize>,
    output: Option<PathBuf>,
    pretty: bool,
    colored: bool,
) -> Result<()> {
    let weight = weight.unwrap_or(config.retrieval.semantic_weight);
    Validator::validate_weight(weight)?;
    Validator::validate_question(question)?;

    let mut settings = QuerySettings::from(config);
    if let Some(k) = top_k {
        Validator::validate_top_k(k)?;
        settings.top_k = k;
    }

    let documents = load_documents(config).await?;

    let (tx, rx) = mpsc::unbounded_channel::<QueryEvent>();
    let renderer = tokio::spawn(ConsoleRenderer::new(colored).run(rx));

    let outcome = async {
        let orchestrator = QueryOrchestrator::initialize(
            documents,
            Arc::new(HttpEmbeddingClient::new(&config.embedding)),
            Arc::new(HttpGenerationClient::new(&config.generation)),
            settings,
            &tx,
        )?;
        orchestrator.run_query(question, weight, &tx).await
    }
    .await;

    drop(tx);
    let stats = renderer.await.context("Console renderer task failed")?;
    let answer = outcome.context("Query failed")?;

    info!(
        "Streamed {} chunks in {:.2}s ({:.1} chunks/sec), {} analysis chars, {} answer chars",
        stats.chunks,
        stats.elapsed.as_secs_f64(),
        stats.chunks_per_second(),
        stats.analysis_chars,
        stats.answer_chars
    );
    if answer.is_unsplit() {
        println!("{}", format_warning("Model output never reached the answer section"));
    }

    if let Some(dir) = output {
        let exporter = AnswerExporter::new(dir)?;
        let path = exporter.export(&answer, pretty)?;
        println!("{}", format_success(&format!("Answer written to {}", path.display())));
    }

    Ok(())
}

async fn cmd_search(
    config: &Config,
    query: &str,
    weight: Option<f32>,
    top_k: Option<usize>,
) -> Result<()> {
    let weight = weight.unwrap_or(config.retrieval.semantic_weight);
    let k = top_k.unwrap_or(config.retrieval.top_k);

    let documents = load_documents(config).await?;
    let orchestrator = QueryOrchestrator::initialize(
        documents,
        Arc::new(HttpEmbeddingClient::new(&config.embedding)),
        Arc::new(HttpGenerationClient::new(&config.generation)),
        QuerySettings::from(config),
        &NullSink,
    )?;

    let start_time = Instant::now();
    let hits = orchestrator
        .retrieve(query, weight, k, &NullSink)
        .await
        .context("Search failed")?;

    println!(
        "{}",
        format_info(&format!(
            "{} results for \"{}\" in {:.2}s",
            hits.len(),
            query,
            start_time.elapsed().as_secs_f64()
        ))
    );
    println!();

    for (rank, hit) in hits.iter().enumerate() {
        let doc = hit.document.as_ref();
        println!(
            "{}. {} {}",
            rank + 1,
            doc.id.bold(),
            format_score(hit.score).green()
        );
        println!(
            "   semantic {} | lexical {}",
            format_score(hit.semantic_score),
            format_score(hit.lexical_score)
        );
        if !doc.metadata.title.is_empty() {
            println!("   {}", doc.metadata.title);
        }
        println!("   {}", Validator::truncate_text(&doc.text, 200));
        println!();
    }

    Ok(())
}

async fn cmd_stats(config: &Config) -> Result<()> {
    let documents = load_documents(config).await?;
    let engine = RetrievalEngine::initialize(documents).context("Failed to build index")?;
    let stats = engine.stats();

    let embedder = HttpEmbeddingClient::new(&config.embedding);

    println!("{}", "Index Statistics".bold());
    println!("Dataset:            {}", config.dataset.source);
    println!("Documents:          {}", stats.documents);
    println!("Distinct terms:     {}", stats.terms);
    println!("Embedding dim:      {}", stats.dimension);
    println!(
        "Embedding model:    {} at {}",
        embedder.name(),
        config.embedding.endpoint
    );
    println!("Generation model:   {}", config.generation.model);
    println!(
        "Retrieval:          top_k={} weight={:.2} lexical_candidates={}",
        config.retrieval.top_k,
        config.retrieval.semantic_weight,
        config.retrieval.lexical_candidates
    );

    Ok(())
}
