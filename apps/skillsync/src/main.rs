mod candidate;
mod cli;
mod config;
mod document;
mod dump;
mod errors;
mod llm_client;
mod matching;
mod models;
mod pipeline;
mod routes;
mod state;
mod store;
mod summary;
mod taxonomy;
mod text;

use std::net::SocketAddr;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::document::DocumentSource;
use crate::llm_client::LlmClient;
use crate::pipeline::{Pipeline, RunReport};
use crate::routes::build_router;
use crate::state::AppState;
use crate::llm_client::Classifier;
use crate::store::{CouchbaseClient, QueryStore};
use crate::summary::{generate_summary, load_prompt_config};

/// Exit code for a run that matched skills but could not persist all of them.
const EXIT_PARTIAL: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    // Logs go to stderr so stdout stays clean for progress and reports.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli.command, config).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, mut config: Config) -> Result<ExitCode> {
    match command {
        Commands::Process {
            input,
            candidate_id,
            api_key,
            json,
        } => {
            if api_key.is_some() {
                config.model_api_key = api_key;
            }
            let report = process(&config, &input, candidate_id).await?;
            print_report(&report, json)?;
            if report.is_complete() {
                println!("Done.");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("Done with errors: some writes failed (re-running is safe).");
                Ok(ExitCode::from(EXIT_PARTIAL))
            }
        }
        Commands::Summarize { input, api_key } => {
            if api_key.is_some() {
                config.model_api_key = api_key;
            }
            summarize(&config, &input).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Dump { output } => {
            run_dump(&config, &output).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn build_pipeline(config: &Config, store: Arc<dyn QueryStore>, api_key: String) -> Pipeline {
    let llm = LlmClient::from_config(config, api_key);
    info!("LLM client initialized (model: {})", llm.model());
    Pipeline::new(
        store,
        Arc::new(llm),
        config.bucket.clone(),
        config.upsert_concurrency,
    )
}

fn build_summarizer(config: &Config, api_key: String) -> LlmClient {
    LlmClient::from_config(config, api_key).with_temperature(config.summary_temperature)
}

async fn summarize(config: &Config, input: &str) -> Result<()> {
    let api_key = config.require_model_api_key()?.to_string();
    let prompt_config = load_prompt_config(&config.summary_prompt_path)?;
    let summarizer = build_summarizer(config, api_key);

    let source = DocumentSource::from_arg(input);
    let candidate_data = tokio::task::spawn_blocking(move || source.extract_text())
        .await
        .context("Extraction task panicked")??;

    let summary = generate_summary(&summarizer, &prompt_config, &candidate_data)
        .await
        .context("Summary generation failed")?;
    println!("{summary}");
    Ok(())
}

async fn process(config: &Config, input: &str, candidate_id: i64) -> Result<RunReport> {
    let api_key = config.require_model_api_key()?.to_string();
    let store: Arc<dyn QueryStore> = Arc::new(CouchbaseClient::from_config(config));
    let pipeline = build_pipeline(config, store, api_key);

    let source = DocumentSource::from_arg(input);
    println!("Input: {}", source.describe());
    println!("Matching skills for candidate {candidate_id}...");

    let report = pipeline
        .run(source, candidate_id)
        .await
        .context("Skill extraction failed")?;
    Ok(report)
}

fn print_report(report: &RunReport, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!(
        "Extracted {} chars. Loaded {} skills.",
        report.cv_chars, report.taxonomy_size
    );
    println!("Found {} matching skills.", report.matched.len());
    if report.update.cv_text_updated() {
        println!("CVText updated.");
    } else if let Some(err) = &report.update.cv_text_error {
        println!("Error updating CVText: {err}");
    }
    for skill in &report.update.linked {
        println!("Linked Skill: {}", skill.name);
    }
    for failure in &report.update.failed {
        println!("Failed to link skill {}: {}", failure.skill.name, failure.error);
    }
    if report.unknown_ids_dropped > 0 || report.repeated_ids_dropped > 0 {
        println!(
            "Ignored {} unknown and {} repeated ids from the model.",
            report.unknown_ids_dropped, report.repeated_ids_dropped
        );
    }
    Ok(())
}

async fn run_dump(config: &Config, output: &Path) -> Result<()> {
    let store = CouchbaseClient::from_config(config);
    println!("Fetching data from {}...", config.store_endpoint);
    let data = dump::fetch_all(&store, &config.bucket).await?;
    let pretty = serde_json::to_string_pretty(&data)?;
    tokio::fs::write(output, pretty)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Successfully created {}", output.display());
    Ok(())
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting skillsync API v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn QueryStore> = Arc::new(CouchbaseClient::from_config(&config));
    info!("Query store client initialized ({})", config.store_endpoint);

    let (pipeline, summarizer) = match config.model_api_key.clone() {
        Some(key) => {
            let summarizer: Arc<dyn Classifier> =
                Arc::new(build_summarizer(&config, key.clone()));
            (
                Some(build_pipeline(&config, store.clone(), key)),
                Some(summarizer),
            )
        }
        None => {
            warn!("AI_API_KEY not set; CV processing and summary routes are disabled");
            (None, None)
        }
    };

    let summary_prompt = match load_prompt_config(&config.summary_prompt_path) {
        Ok(prompt) => Some(Arc::new(prompt)),
        Err(e) => {
            warn!("{e}; summary route will answer 500");
            None
        }
    };

    let state = AppState {
        store,
        pipeline,
        summarizer,
        summary_prompt,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
