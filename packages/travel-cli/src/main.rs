//! Travel CLI
//!
//! Drives the recommendation graph from the terminal: an interactive chat,
//! a single turn against a JSON state file, or a dump of the stage graph.

mod config;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use travel_graph::ai::OpenAI;
use travel_graph::{Message, MemoryCorpus, MemoryFavorites, TravelGraph, TurnRequest, TurnResult};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "travel", version, about = "Conversational travel recommendations")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Chat over multiple turns on stdin
    Chat {
        /// Identity used for favorites
        #[arg(long)]
        identity: Option<String>,
    },
    /// Run a single turn
    Turn {
        utterance: String,
        /// JSON file holding the previous turn's result; updated afterwards
        #[arg(long)]
        state: Option<PathBuf>,
        #[arg(long)]
        identity: Option<String>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the stage graph as Mermaid
    Graph,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,travel_graph=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::Chat { identity } => {
            let graph = build_graph(&config)?;
            chat(&graph, identity).await
        }
        Command::Turn {
            utterance,
            state,
            identity,
            json,
        } => {
            let graph = build_graph(&config)?;
            turn(&graph, utterance, state.as_deref(), identity, json).await
        }
        Command::Graph => {
            println!("{}", travel_graph::pipeline::mermaid());
            Ok(())
        }
    }
}

fn build_graph(config: &Config) -> Result<TravelGraph> {
    let corpus = match &config.corpus_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read corpus {}", path.display()))?;
            MemoryCorpus::from_json(&json)
                .with_context(|| format!("Invalid corpus file {}", path.display()))?
        }
        None => MemoryCorpus::sample(),
    };
    if corpus.is_empty() {
        tracing::warn!("Corpus is empty, every search will come back without matches");
    } else {
        tracing::info!(candidates = corpus.len(), "Corpus loaded");
    }

    let mut graph = TravelGraph::new(corpus, MemoryFavorites::with_sample())
        .with_config(config.graph_config());

    match &config.openai_api_key {
        Some(key) => {
            let mut ai = OpenAI::new(key.clone()).with_model(config.model.clone());
            if let Some(url) = &config.openai_base_url {
                ai = ai.with_base_url(url.clone());
            }
            tracing::info!(model = %config.model, "External classifier and phraser enabled");

            let ai = Arc::new(ai);
            graph = graph.with_classifier(ai.clone()).with_phraser(ai);
        }
        None => tracing::warn!("OPENAI_API_KEY not set, using keyword rules and templates"),
    }

    Ok(graph)
}

/// Next request, continuing from the previous result when there is one.
fn next_request(utterance: String, previous: Option<&TurnResult>, identity: Option<&str>) -> TurnRequest {
    let request = match previous {
        Some(previous) => TurnRequest::continuing(utterance, previous),
        None => TurnRequest::new(utterance),
    };
    match identity {
        Some(identity) => request.with_identity(identity),
        None => request,
    }
}

/// Record the reply in the transcript so the next turn sees it.
fn remember(mut result: TurnResult) -> TurnResult {
    result.history.push(Message::assistant(result.response.clone()));
    result
}

async fn chat(graph: &TravelGraph, identity: Option<String>) -> Result<()> {
    println!("{}", "여행 추천 챗봇입니다. 종료하려면 'exit'를 입력하세요.".bright_cyan());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut previous: Option<TurnResult> = None;

    loop {
        print!("{} ", ">".bright_green().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let utterance = line.trim();
        if utterance.is_empty() {
            continue;
        }
        if matches!(utterance, "exit" | "quit" | "종료") {
            break;
        }

        let request = next_request(utterance.to_string(), previous.as_ref(), identity.as_deref());
        let result = graph.process_turn(request).await;
        print_result(&result);

        // A failed turn keeps the last good state
        if !result.is_error() {
            previous = Some(remember(result));
        }
    }

    println!("{}", "안녕히 가세요!".bright_blue());
    Ok(())
}

async fn turn(
    graph: &TravelGraph,
    utterance: String,
    state: Option<&Path>,
    identity: Option<String>,
    json: bool,
) -> Result<()> {
    let previous = match state {
        Some(path) if path.exists() => Some(load_state(path)?),
        _ => None,
    };

    let request = next_request(utterance, previous.as_ref(), identity.as_deref());
    let result = graph.process_turn(request).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }

    if let (Some(path), false) = (state, result.is_error()) {
        let body = serde_json::to_string_pretty(&remember(result))?;
        std::fs::write(path, body)
            .with_context(|| format!("Failed to write state {}", path.display()))?;
    }

    Ok(())
}

fn load_state(path: &Path) -> Result<TurnResult> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read state {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid state file {}", path.display()))
}

fn print_result(result: &TurnResult) {
    if let Some(error) = &result.error {
        println!("{}", result.response.red());
        tracing::debug!(%error, "Turn error");
        return;
    }

    if result.needs_clarification {
        println!("{}", result.response.yellow());
        return;
    }

    println!("{}", result.response);

    let filters = serde_json::to_string(&result.filters).unwrap_or_default();
    println!("{} {}", "filters:".dimmed(), filters.dimmed());
}
