//! `sift` - search the web for a query, then summarize what was found.
//!
//! Runs the two-stage pipeline against live providers and prints an event
//! trace followed by the final report. Credentials are validated before
//! anything touches the network.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use futures::StreamExt;
use sift_agents::{Credentials, EmbeddingSettings, LlmSettings, SearchAgent, SummarizeAgent};
use sift_core::SiftError;
use sift_core::agent::{Agent, SequentialAgent};
use sift_core::message::Message;
use sift_core::report::RunResult;
use sift_core::runner::Runner;
use sift_core::session::{InMemorySessionService, Session};
use tracing_subscriber::EnvFilter;

const APP_NAME: &str = "sift";
const USER_ID: &str = "user123";
const WORKFLOW_NAME: &str = "ResearchAndSummarizeWorkflow";
const DEFAULT_QUERY: &str = "latest developments in artificial intelligence and machine learning";

#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Search the web and summarize what it finds", long_about = None)]
struct Cli {
    /// Search query; prompts interactively when omitted
    #[arg(short, long)]
    query: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sift=info")),
        )
        .init();

    let cli = Cli::parse();

    // Credentials first: no agent, client, or network activity exists until
    // all three keys are present.
    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(SiftError::MissingCredentials(names)) => {
            eprintln!("❌ Missing required environment variables:");
            for name in names {
                eprintln!("   - {name}");
            }
            eprintln!("\nPlease ensure all API keys are set before running.");
            return ExitCode::FAILURE;
        }
        Err(err) => {
            eprintln!("❌ Fatal error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let query = match cli.query {
        Some(query) if !query.trim().is_empty() => query,
        _ => prompt_for_query(),
    };

    println!("\n🚀 Initializing multi-agent system...");
    println!("🎯 Search Query: {query}");
    println!("⏳ This may take a few moments...\n");

    match run(credentials, &query).await {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            // Outermost boundary: one fatal line, no stack dump.
            eprintln!("❌ Fatal error: {err}");
            eprintln!("Please check your API keys and network connection.");
            ExitCode::FAILURE
        }
    }
}

/// Builds the pipeline, drives it to completion, and renders the report.
async fn run(credentials: Credentials, query: &str) -> Result<String> {
    let search = Arc::new(SearchAgent::new(credentials.serpapi_api_key));
    let summarize = Arc::new(SummarizeAgent::new(
        LlmSettings::new(credentials.openai_api_key),
        EmbeddingSettings::new(credentials.google_api_key),
    ));
    let pipeline = SequentialAgent::new(
        WORKFLOW_NAME,
        vec![search as Arc<dyn Agent>, summarize as Arc<dyn Agent>],
    )?;

    let runner = Runner::new(
        APP_NAME,
        Arc::new(pipeline),
        Arc::new(InMemorySessionService::new()),
    );
    let session_id = Session::generate_id();

    let mut events = runner
        .run(USER_ID, &session_id, Message::text(query))
        .await?;
    println!("{}", "-".repeat(40));
    while let Some(event) = events.next().await {
        let content = event.joined_text();
        let content = if content.is_empty() {
            "[No text content]".to_string()
        } else {
            content
        };
        let delta = match &event.state_delta {
            Some(delta) => {
                let mut keys: Vec<&str> = delta.keys().map(String::as_str).collect();
                keys.sort_unstable();
                keys.join(", ")
            }
            None => "None".to_string(),
        };
        println!(
            "[EVENT from {}]: Content='{content}', State Delta={delta}",
            event.author
        );
    }
    println!("{}", "-".repeat(40));

    // Authoritative final state comes from the store, not from any reference
    // held across the run.
    let session = runner.session(USER_ID, &session_id).await?;
    let result = RunResult::from_session(&session, query).await;
    Ok(result.render())
}

/// Asks for a query on stdin, falling back to the default on empty input.
fn prompt_for_query() -> String {
    print!("Enter your search query (or press Enter for default): ");
    let _ = io::stdout().flush();

    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return DEFAULT_QUERY.to_string();
    }

    let trimmed = line.trim();
    if trimmed.is_empty() {
        DEFAULT_QUERY.to_string()
    } else {
        trimmed.to_string()
    }
}
