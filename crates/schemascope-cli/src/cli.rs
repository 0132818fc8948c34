//! schemascope command-line interface

mod config;
mod render;

use anyhow::{Context, anyhow};
use clap::{Parser, ValueEnum};
use schemascope_analyzer::{SchemaAnalyzerService, SchemaOptimizerService, StrategyRegistry};
use schemascope_mysql::MySqlConnection;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, DEFAULT_STRATEGY};

/// Analyze and optionally optimize a MySQL database schema
#[derive(Debug, Parser)]
#[command(name = "schemascope", version)]
struct Cli {
    /// Named connection profile to analyze (defaults to the configured default)
    #[arg(long)]
    connection: Option<String>,

    /// Analysis strategy to use (basic or advanced; defaults to the configured default)
    #[arg(long)]
    strategy: Option<String>,

    /// Derive optimization suggestions after the analysis
    #[arg(long)]
    optimize: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Path to the config file (defaults to the per-user config location)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {:#}", error);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let connection_name = cli
        .connection
        .or_else(|| config.default_connection.clone())
        .ok_or_else(|| anyhow!("no connection given and no default_connection configured"))?;
    let profile = config
        .connections
        .get(&connection_name)
        .ok_or_else(|| anyhow!("connection '{}' is not configured", connection_name))?;

    let strategy_name = cli
        .strategy
        .or_else(|| config.default_strategy.clone())
        .unwrap_or_else(|| DEFAULT_STRATEGY.to_string());

    // Reject unknown strategy names before touching the database
    let registry = StrategyRegistry::with_defaults();
    let factory = registry.resolve(&strategy_name)?;

    let chatty = cli.format == OutputFormat::Table;
    if chatty {
        println!(
            "Analyzing database schema for connection: {} using {} strategy",
            connection_name, strategy_name
        );
    }

    let connection = Arc::new(
        MySqlConnection::connect(
            &profile.host,
            profile.port,
            profile.database.as_deref(),
            profile.user.as_deref(),
            profile.password.as_deref(),
        )
        .await
        .with_context(|| format!("connecting to '{}'", connection_name))?,
    );

    let strategies = factory(connection.clone());
    let analyzer = SchemaAnalyzerService::new(connection.clone(), strategies.analysis);
    let analysis = analyzer.analyze().await?;

    let optimization = if cli.optimize {
        if chatty {
            println!("Optimizing database schema...");
        }
        let optimizer = SchemaOptimizerService::new(strategies.optimization);
        Some(optimizer.optimize(&analysis)?)
    } else {
        None
    };

    match cli.format {
        OutputFormat::Table => {
            render::print_analysis(&analysis);
            if let Some(optimization) = &optimization {
                render::print_optimization(optimization);
            }
        }
        OutputFormat::Json => render::print_json(&analysis, optimization.as_ref())?,
    }

    Ok(())
}
