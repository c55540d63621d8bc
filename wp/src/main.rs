//! Weekplan - LLM-assisted weekly task planner
//!
//! CLI entry point: runs the HTTP server or inspects the stored week.

use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info};

use weekplan::calendar;
use weekplan::cli::{Cli, Command};
use weekplan::config::Config;
use weekplan::llm::create_client;
use weekplan::planner::Planner;
use weekplan::prompts::PromptLoader;
use weekplan::server::{AppState, serve};
use weekplan::store::{DocPlanStore, PlanStore};

fn setup_logging(cli_log_level: Option<&str>) {
    let level = match cli_log_level.map(|s| s.to_uppercase()) {
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            other => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.log_level.as_deref());

    let config = Config::from_env();
    info!(model = %config.oracle.model, store = %config.store_path.display(), "weekplan starting");

    match cli.command {
        Some(Command::Week { user }) => {
            let user_id = user.unwrap_or_else(|| config.default_user_id.clone());
            cmd_week(&config, &user_id)
        }
        Some(Command::Serve { listen }) => {
            let listen = listen.unwrap_or_else(|| config.listen_addr.clone());
            cmd_serve(&config, &listen).await
        }
        None => {
            let listen = config.listen_addr.clone();
            cmd_serve(&config, &listen).await
        }
    }
}

/// Print the current stored week without touching the oracle
fn cmd_week(config: &Config, user_id: &str) -> Result<()> {
    debug!(%user_id, "cmd_week: called");
    let tz = config.tz()?;
    let week_id = calendar::current_week_id(tz);
    let store = DocPlanStore::open(&config.store_path).context("Failed to open store")?;
    let plan = store
        .load_or_init(user_id, &week_id, &calendar::now_utc_iso())
        .context("Failed to load week")?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

async fn cmd_serve(config: &Config, listen: &str) -> Result<()> {
    debug!(%listen, "cmd_serve: called");
    let tz = config.tz()?;
    let llm = create_client(&config.oracle).map_err(|e| eyre::eyre!("Failed to create oracle client: {}", e))?;
    let prompts = Arc::new(PromptLoader::new(config.prompts_dir.as_ref()));
    let store = Arc::new(DocPlanStore::open(&config.store_path).context("Failed to open store")?);

    let planner = Arc::new(Planner::new(store, llm, prompts, tz));
    let state = AppState::new(planner, config.default_user_id.clone())?;

    serve(state, listen).await
}
