//! Command-line entry point for running the agentdeck catalog.

mod config;

use agentdeck_agent::RunResult;
use agentdeck_builtins::{register_builtins, register_registry_builtins, InMemoryRecordStore};
use agentdeck_orchestrator::{
    default_catalog, AgentRegistry, OrchestrationResult, Orchestrator, TrackerStatus,
};
use clap::{Parser, Subcommand, ValueEnum};
use config::{load_config, AgentdeckConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agentdeck", about = "Agentdeck: run the dashboard agent catalog")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "agentdeck.toml")]
    config: PathBuf,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the whole catalog category by category, honoring dependencies
    Run {
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run every agent through the registry, without dependency checks
    Direct {
        /// Launch all agents at once instead of one after another
        #[arg(long)]
        concurrent: bool,
        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the catalog
    Catalog,
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = load_config(&cli.config).await?;

    match cli.command {
        Commands::Run { json } => {
            let result = run_orchestrated(&config).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_orchestration(&result);
            }
        }
        Commands::Direct { concurrent, json } => {
            let results = run_direct(&config, concurrent).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print_direct(&results);
            }
        }
        Commands::Catalog => {
            let catalog = default_catalog()?;
            for category in catalog.populated_categories() {
                println!("[{category}]");
                for descriptor in catalog.in_category(category) {
                    let mut line = format!("  {:<24} {}", descriptor.id, descriptor.name);
                    if !descriptor.dependencies.is_empty() {
                        line.push_str(&format!(" (after: {})", descriptor.dependencies.join(", ")));
                    }
                    if !descriptor.enabled {
                        line.push_str(" [disabled]");
                    }
                    println!("{line}");
                }
            }
            for dangling in catalog.dangling_dependencies() {
                println!(
                    "warning: {} depends on unknown id '{}'",
                    dangling.agent_id, dangling.missing
                );
            }
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run_orchestrated(config: &AgentdeckConfig) -> anyhow::Result<OrchestrationResult> {
    let store = Arc::new(InMemoryRecordStore::new());
    let mut orchestrator =
        Orchestrator::with_default_catalog()?.with_config(config.orchestrator.clone());
    register_builtins(&mut orchestrator, store.clone(), &config.agent)?;

    let result = orchestrator.run_all().await;
    info!(
        execution_id = %result.execution_id,
        published = store.len().await,
        "Orchestrated run finished"
    );
    Ok(result)
}

async fn run_direct(config: &AgentdeckConfig, concurrent: bool) -> anyhow::Result<Vec<RunResult>> {
    let store = Arc::new(InMemoryRecordStore::new());
    let catalog = default_catalog()?;
    let mut registry = AgentRegistry::with_config(&config.registry);
    register_registry_builtins(&mut registry, &catalog, store.clone(), &config.agent)?;

    let results = if concurrent {
        registry.run_all_concurrently().await
    } else {
        registry.run_all().await
    };
    let status = registry.status();
    info!(
        completed = status.completed,
        failed = status.failed,
        published = store.len().await,
        "Direct run finished"
    );
    Ok(results)
}

fn print_orchestration(result: &OrchestrationResult) {
    println!("execution {}", result.execution_id);
    for category in &result.categories {
        println!(
            "[{}] {}/{} ok, {} failed, {} skipped in {}ms",
            category.category,
            category.successful,
            category.total,
            category.failed,
            category.skipped,
            category.duration_ms
        );
        for tracker in &category.trackers {
            if tracker.status != TrackerStatus::Success {
                println!(
                    "  {:<24} {} {}",
                    tracker.agent_id,
                    tracker.status,
                    tracker.error.as_deref().unwrap_or("")
                );
            }
        }
    }
    let summary = &result.summary;
    println!(
        "total {}: {} ok, {} failed, {} skipped ({:.1}%) in {}ms",
        summary.total,
        summary.successful,
        summary.failed,
        summary.skipped,
        summary.success_rate,
        summary.duration_ms
    );
}

fn print_direct(results: &[RunResult]) {
    for result in results {
        let outcome = if result.is_success() { "ok" } else { "failed" };
        println!(
            "{:<24} {:<7} {:>5}ms  attempts={} {}",
            result.agent,
            outcome,
            result.latency_ms,
            result.attempts,
            result.error.as_deref().unwrap_or("")
        );
    }
    let ok = results.iter().filter(|r| r.is_success()).count();
    println!("{ok}/{} succeeded", results.len());
}
