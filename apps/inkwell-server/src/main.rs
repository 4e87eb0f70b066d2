use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use modkit::{DbOptions, ModuleEntry, ModuleRegistry, RunOptions, ShutdownOptions};
use modkit_db::{absolutize_sqlite_dsn, ConnectOpts, DbHandle};
use runtime::{AppConfig, CliArgs};
use serde_json::Value;

use accounts::Accounts;
use api_ingress::ApiIngress;
use articles::Articles;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Inkwell - blog articles server
#[derive(Parser)]
#[command(name = "inkwell-server")]
#[command(about = "Inkwell - blog articles server")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and module wiring
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // home_dir is normalized and created while loading
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);
    wire_ingress(&mut config, args.port.is_some());

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Inkwell server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

/// Derive `modules.api_ingress` from the `server` section: `bind_addr` comes
/// from host/port unless set explicitly (`--port` always wins), and a
/// non-zero `server.timeout_sec` becomes the request timeout.
fn wire_ingress(config: &mut AppConfig, port_overridden: bool) {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let timeout_sec = config.server.timeout_sec;

    let section = config
        .modules
        .entry(api_ingress::MODULE_NAME.to_string())
        .or_insert_with(|| Value::Object(Default::default()));
    if let Value::Object(map) = section {
        if port_overridden || !map.contains_key("bind_addr") {
            map.insert("bind_addr".to_string(), Value::String(bind_addr));
        }
        if timeout_sec > 0 && !map.contains_key("request_timeout_sec") {
            map.insert("request_timeout_sec".to_string(), Value::from(timeout_sec));
        }
    }
}

fn build_registry() -> Result<ModuleRegistry> {
    let ingress = Arc::new(ApiIngress::default());
    let accounts = Arc::new(Accounts::default());
    let articles = Arc::new(Articles::default());

    ModuleRegistry::builder()
        .register(
            ModuleEntry::new(api_ingress::MODULE_NAME, ingress.clone())
                .rest_host(ingress.clone())
                .stateful(ingress),
        )
        .register(ModuleEntry::new(accounts::MODULE_NAME, accounts.clone()).db(accounts))
        .register(
            ModuleEntry::new(articles::MODULE_NAME, articles.clone())
                .deps(&[accounts::MODULE_NAME])
                .db(articles.clone())
                .rest(articles),
        )
        .build()
        .context("Invalid module graph")
}

async fn connect_db(config: &AppConfig) -> Result<DbOptions> {
    let Some(db_cfg) = config.database.as_ref() else {
        tracing::warn!("No database configuration found, running without database");
        return Ok(DbOptions::None);
    };

    let dsn = absolutize_sqlite_dsn(db_cfg.url.trim(), Path::new(&config.server.home_dir))
        .context("Invalid database URL")?;
    let engine = DbHandle::detect(&dsn)?;
    let opts = ConnectOpts {
        max_conns: db_cfg.max_conns,
        acquire_timeout: Some(Duration::from_secs(5)),
        sqlite_busy_timeout: Duration::from_millis(u64::from(
            db_cfg.busy_timeout_ms.unwrap_or(5000),
        )),
        create_sqlite_dirs: true,
    };

    tracing::info!(?engine, "Connecting to database");
    let db = DbHandle::connect(&dsn, opts)
        .await
        .context("Failed to connect to database")?;
    Ok(DbOptions::Handle(Arc::new(db)))
}

async fn run_server(config: AppConfig) -> Result<()> {
    let registry = build_registry()?;
    tracing::info!(modules = ?registry, "Modules registered");

    let db = connect_db(&config).await?;
    let run_options = RunOptions {
        modules_cfg: Arc::new(config),
        db,
        shutdown: ShutdownOptions::Signals,
    };

    modkit::run(registry, run_options).await
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    if let Some(db) = &config.database {
        DbHandle::detect(db.url.trim()).context("Invalid database URL")?;
    }
    config.module_config::<api_ingress::ApiIngressConfig>(api_ingress::MODULE_NAME)?;
    config.module_config::<accounts::config::AccountsConfig>(accounts::MODULE_NAME)?;
    config.module_config::<articles::config::ArticlesConfig>(articles::MODULE_NAME)?;
    let registry = build_registry()?;

    println!("Configuration is valid");
    println!("Modules: {registry:?}");
    println!("{}", config.to_yaml()?);
    Ok(())
}
