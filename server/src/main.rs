mod config;
mod console;
mod http;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use platform_import::{ImportSource, RandomUserClient, SalaryPolicy};
use platform_obs::{ObsConfig, init_tracing};
use products_hr::HrModule;
use tokio::io::BufReader;
use tracing::info;

use crate::{
    config::AppConfig,
    console::Console,
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "hr-suite", version, about = "In-memory employee registry")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP API.
    Serve(ServeCommand),
    /// Run the interactive console menu.
    Console,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,
}

impl From<ServeCommand> for ServeConfig {
    fn from(value: ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let obs = match cli.command {
        Command::Console => ObsConfig::console(),
        Command::Serve(_) => ObsConfig::default(),
    };
    init_tracing(obs)?;
    let app_config = Arc::new(AppConfig::load()?);
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, app_config).await,
        Command::Console => run_console(app_config).await,
    }
}

fn build_importer(config: &AppConfig) -> Result<Arc<dyn ImportSource>> {
    let client = RandomUserClient::new(
        config.import.base_url.clone(),
        config.import.nationality.clone(),
        config.import.timeout,
    )
    .context("failed to build import client")?;
    Ok(Arc::new(client))
}

async fn run_server(cmd: ServeCommand, config: Arc<AppConfig>) -> Result<()> {
    let state = AppState {
        hr: HrModule::new(),
        importer: build_importer(&config)?,
        salaries: SalaryPolicy::default(),
        config,
    };
    http::serve(cmd.into(), state).await
}

async fn run_console(config: Arc<AppConfig>) -> Result<()> {
    info!("starting interactive console");
    let mut console = Console::new(
        HrModule::new(),
        build_importer(&config)?,
        config.import.default_count,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    );
    console.run().await
}
