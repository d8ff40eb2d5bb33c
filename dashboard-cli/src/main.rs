// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Gateway Dashboard — admin console
//
//  Routes:   CRUD over the admin API, edited as three-step forms
//  Plugins:  per-plugin configuration forms
//  Config:   optional YAML file + DASHBOARD_* env overrides
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

mod commands;

use clap::Parser;
use commands::{Command, OutputFormat};
use dashboard_client::DashboardClient;
use dashboard_core::ClientConfig;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "dashboard", version, about = "Gateway Dashboard — admin console")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Admin API base URL, overrides the config file
    #[arg(long)]
    base_url: Option<String>,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ── Tracing ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // ── Config ──
    let mut config = match cli.config {
        Some(ref path) if path.exists() => {
            info!(path = %path.display(), "Loading config file");
            ClientConfig::load(Some(path.as_path()))?
        }
        Some(ref path) => anyhow::bail!("config file {} does not exist", path.display()),
        None => ClientConfig::load(None)?,
    };
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    debug!(base_url = %config.base_url, "Admin API");

    let client = DashboardClient::new(config)?;
    let value = commands::run(&client, cli.command).await?;
    println!("{}", commands::render(&value, cli.output)?);
    Ok(())
}
