use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use configuration::{init_tracing, load_config, Config};
use core_types::RawDealRecord;
use database::{connect, run_migrations, DbRepository};
use indicatif::{ProgressBar, ProgressStyle};
use query::QueryFacade;
use std::path::PathBuf;
use std::time::Duration;

mod render;

/// The main entry point for the deal valuation tool.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    // Held until exit so buffered file logs are flushed.
    let _log_guard = init_tracing(&config.logging)?;

    match cli.command {
        Commands::Query(args) => handle_query(args, &config).await,
        Commands::Import(args) => handle_import(args, &config).await,
        Commands::Migrate => {
            let pool = pool_from_config(&config).await?;
            run_migrations(&pool).await?;
            tracing::info!("Migrations applied.");
            Ok(())
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Derived volume and valuation metrics over raw deal records.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file. A missing file means defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the totals, deal-series and snapshot tables for a keyword.
    Query(QueryArgs),
    /// Load raw deal records from a JSON file into the record store.
    Import(ImportArgs),
    /// Apply the record store schema migrations.
    Migrate,
}

#[derive(Parser)]
struct QueryArgs {
    /// The keyword to query (defaults to `query.default_keyword` from the config).
    #[arg(long)]
    keyword: Option<String>,

    /// Start of the date range (format: YYYY-MM-DD).
    #[arg(long)]
    from: Option<String>,

    /// End of the date range and snapshot date (format: YYYY-MM-DD).
    #[arg(long)]
    to: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Parser)]
struct ImportArgs {
    /// A JSON array of raw deal records.
    #[arg(long)]
    file: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_query(args: QueryArgs, config: &Config) -> anyhow::Result<()> {
    let pool = pool_from_config(config).await?;
    let facade = QueryFacade::from_config(DbRepository::new(pool), config);

    let result = facade
        .run_query(
            args.keyword.as_deref().unwrap_or_default(),
            args.from.as_deref(),
            args.to.as_deref(),
        )
        .await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Table => render::print_tables(&result),
    }
    Ok(())
}

async fn handle_import(args: ImportArgs, config: &Config) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let records: Vec<RawDealRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing deal records from {}", args.file.display()))?;

    let pool = pool_from_config(config).await?;
    run_migrations(&pool).await?;
    let repo = DbRepository::new(pool);

    let progress_bar = ProgressBar::new(records.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("#>-"),
    );

    for record in &records {
        repo.save_record(record).await?;
        progress_bar.inc(1);
    }
    progress_bar.finish_with_message("Import complete!");

    tracing::info!(count = records.len(), file = %args.file.display(), "Imported deal records.");
    Ok(())
}

/// Opens the connection pool with the configured limits.
async fn pool_from_config(config: &Config) -> anyhow::Result<sqlx::PgPool> {
    let pool = connect(
        config.database.max_connections,
        Duration::from_secs(config.database.acquire_timeout_secs),
    )
    .await?;
    Ok(pool)
}
