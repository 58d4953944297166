use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use modkit::{DbModule, RestfulModule};
use modkit_db::{absolutize_sqlite_dsn, redact_credentials_in_dsn, ConnectOpts, DbHandle};
use pr_review::config::PrReviewConfig;
use pr_review::PrReview;
use runtime::{AppConfig, CliArgs, DatabaseConfig};

mod http;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const MEMORY_DSN: &str = "sqlite::memory:";

/// PR Review Server - assigns pull request reviewers from the author's team
#[derive(Parser)]
#[command(name = "pr-review-server")]
#[command(about = "PR Review Server - assigns pull request reviewers from the author's team")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database instead of the configured one
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI args passed down to config/app
    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("PR Review Server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config, args),
    }
}

/// DSN to connect to: in-memory under `--mock`, sqlite paths resolved against home_dir.
fn effective_dsn(config: &AppConfig, args: &CliArgs) -> Result<String> {
    if args.mock {
        return Ok(MEMORY_DSN.to_string());
    }
    let db = config
        .database
        .as_ref()
        .context("database section is missing; configure database.url or pass --mock")?;
    let dsn = db.url.trim();
    if dsn.is_empty() {
        anyhow::bail!("Database URL not configured");
    }
    DbHandle::detect(dsn).with_context(|| "unsupported database.url")?;
    Ok(absolutize_sqlite_dsn(dsn, Path::new(&config.server.home_dir)))
}

fn connect_opts(db: Option<&DatabaseConfig>) -> ConnectOpts {
    let mut opts = ConnectOpts {
        acquire_timeout: Some(Duration::from_secs(5)),
        ..Default::default()
    };
    if let Some(db) = db {
        if db.max_conns.is_some() {
            opts.max_conns = db.max_conns;
        }
        if let Some(ms) = db.busy_timeout_ms {
            opts.sqlite_busy_timeout = Duration::from_millis(u64::from(ms));
        }
    }
    opts
}

fn bind_addr(config: &AppConfig) -> Result<SocketAddr> {
    let raw = format!("{}:{}", config.server.host, config.server.port);
    raw.parse()
        .with_context(|| format!("invalid bind address '{raw}'"))
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    let addr = bind_addr(&config)?;
    let module_cfg: PrReviewConfig = config.module_config("pr_review")?;
    module_cfg.validate()?;

    let dsn = effective_dsn(&config, &args)?;
    tracing::info!(dsn = %redact_credentials_in_dsn(Some(&dsn)), "Connecting to database");
    let db = DbHandle::connect(&dsn, connect_opts(config.database.as_ref())).await?;
    tracing::info!(engine = ?db.engine(), "Connected to database");

    let module = PrReview::new(&db, module_cfg)?;
    module.migrate(&db).await?;

    let router = module.register_rest(http::base_router())?;
    let router = http::with_middleware(router, config.server.timeout_sec);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "HTTP server bound");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = modkit::runtime::wait_for_shutdown().await {
                tracing::error!(error = %e, "signal handler failed");
            }
            tracing::info!("HTTP server shutting down gracefully");
        })
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    db.close().await;
    tracing::info!("PR Review Server stopped");
    Ok(())
}

fn check_config(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    bind_addr(&config)?;
    let dsn = effective_dsn(&config, &args)?;
    let module_cfg: PrReviewConfig = config.module_config("pr_review")?;
    module_cfg.validate()?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("database: {}", redact_credentials_in_dsn(Some(&dsn)));
    println!(
        "pr_review: max_reviewers={}, serializable_transactions={}",
        module_cfg.max_reviewers, module_cfg.serializable_transactions
    );
    Ok(())
}
