// dbforge: AI-assisted database design CLI
//
// This is the main entry point for the dbforge application.

use anyhow::{Context, Result};
use dbforge::cli::{bootstrap, Orchestrator, TerminalPrompter};
use dbforge::config::{process_env, startup_log_level};
use dbforge::llm::{gemini_from_config, open_router_from_config};
use dbforge::setup::{NodeModulesResolver, ProjectLayout, ShellCommandRunner};
use std::time::Duration;
use tracing::Level;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = run().await {
        eprintln!("🔥 Error: {:#}", e);
    }

    println!("\n👋 Finished. You can now explore your project.");
    Ok(())
}

async fn run() -> Result<()> {
    let layout = ProjectLayout::current().context("cannot determine the project directory")?;
    init_logging(&startup_log_level(&layout.env_path, process_env));
    let config = bootstrap(&layout, process_env).context("project setup failed")?;

    println!("🚀 Welcome to AI Database CLI Tool!");
    println!("Example: \"A blog where users can write posts and leave comments\"\n");

    let intent_client = open_router_from_config(&config)?;
    let schema_client = gemini_from_config(&config)?;
    let resolver = NodeModulesResolver::new(&layout.root);
    let runner = ShellCommandRunner::new(
        &layout.root,
        Duration::from_secs(config.setup_timeout_secs),
    );

    let mut prompter = TerminalPrompter::new()?;
    let orchestrator = Orchestrator::new(
        &config,
        &layout,
        &intent_client,
        &schema_client,
        &resolver,
        &runner,
    );

    let outcome = orchestrator.run(&mut prompter).await;

    if let Err(e) = prompter.save_history() {
        tracing::debug!(error = %e, "could not save prompt history");
    }

    tracing::info!(?outcome, "run finished");
    outcome?;
    Ok(())
}

fn init_logging(log_level: &str) {
    let level = log_level.parse::<Level>().unwrap_or(Level::WARN);

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
