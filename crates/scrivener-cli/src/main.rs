//! Scrivener CLI - research, write, critique
//!
//! Usage:
//!   scrivener time <TZ>          - Current time in a timezone
//!   scrivener research <TOPIC>   - Canned research snippets
//!   scrivener write              - Markdown report from a JSON context
//!   scrivener critique           - Check a report against its context
//!   scrivener run <TOPIC>        - Drive the full pipeline through the agent loop
//!   scrivener tools              - Print the agent registration and tool schemas

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scrivener_core::{
    run_agent_turn, AgentDefinition, AgentEvent, PipelineOrchestrator, ScrivenerConfig, Toolbox,
    TracingSink,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "scrivener")]
#[command(author = "HeyBattle1")]
#[command(version)]
#[command(about = "Research, writing and critique tools for an agent", long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Current local time for an IANA timezone name
    Time {
        /// e.g. Asia/Kolkata
        city: String,
    },

    /// Fabricated research snippets for a topic
    Research { topic: String },

    /// Write a markdown report from a JSON context
    Write {
        /// Context object, e.g. '{"topic": "Cats", "snippets": [...]}'
        #[arg(long)]
        context: String,
    },

    /// Score a report's coverage of the context's snippet titles
    Critique {
        /// writer output (or any object with a "report" field)
        #[arg(long)]
        report: String,

        #[arg(long)]
        context: String,
    },

    /// Run research -> writer -> critic through the agent loop
    Run { topic: String },

    /// Show the agent definition and tool schemas
    Tools,
}

fn parse_json(raw: &str, what: &str) -> Result<Value> {
    serde_json::from_str(raw).with_context(|| format!("--{} is not valid JSON", what))
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = ScrivenerConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    tracing::debug!(agent = %config.agent.name, model = %config.agent.model, "Loaded config");

    let toolbox = Toolbox::new(Arc::new(TracingSink::from_config(&config.trace)));
    let agent = AgentDefinition::root(&config.agent);

    match cli.command {
        Commands::Time { city } => print_json(&toolbox.get_current_time(&city))?,

        Commands::Research { topic } => print_json(&toolbox.research_tool(&topic))?,

        Commands::Write { context } => {
            let context = parse_json(&context, "context")?;
            print_json(&toolbox.writer_tool(Some(&context)))?;
        }

        Commands::Critique { report, context } => {
            let report = parse_json(&report, "report")?;
            let context = parse_json(&context, "context")?;
            print_json(&toolbox.critic_tool(Some(&report), Some(&context)))?;
        }

        Commands::Run { topic } => {
            let mut orchestrator = PipelineOrchestrator::with_topic(topic.clone());
            let response = run_agent_turn(&agent, &toolbox, &mut orchestrator, &topic, |event| {
                match event {
                    AgentEvent::Thinking => {}
                    AgentEvent::ToolCall { name, preview } => eprintln!("🔧 {} {}", name, preview),
                    AgentEvent::ToolResult { name, preview } => eprintln!("✅ {} {}", name, preview),
                    AgentEvent::Response(_) => {}
                    AgentEvent::Error(msg) => eprintln!("❌ {}", msg),
                }
            })
            .await?;
            println!("{}", response);
        }

        Commands::Tools => print_json(&json!({
            "agent": agent,
            "tools": agent.tool_schemas(),
        }))?,
    }

    Ok(())
}
