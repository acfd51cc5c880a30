use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use cli_program::CLIProgram;
use cloudflare_provider::CloudflareProvider;
use config::Config;
use error::Result;

mod cli_program;
mod cloudflare_provider;
mod config;
mod discord_webhook;
mod dns_provider;
mod domain;
mod error;
mod ip_handler;
mod webhook_notifier;

#[derive(Parser)]
#[command(
    name = "ddns-sync",
    version,
    about = "Keeps a Cloudflare A record pointed at your current public IP"
)]
struct Cli {
    /// Path to the config file (defaults to config.json next to the executable)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Compare the published record to the current public IP, updating it on a mismatch
    Sync {
        /// Update the record even if the IP has not changed
        #[arg(long)]
        force: bool,
    },
    /// Interactively create a config file
    Init,
    /// Generate shell completions
    Completions { shell: Shell },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set up logging: {e}");
        return ExitCode::from(2);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = Config::config_path(cli.config)?;
    match cli.command.unwrap_or(Command::Sync { force: false }) {
        Command::Sync { force } => {
            let config = Config::load(&config_path)?;
            let api = CloudflareProvider::new(config.cloudflare.api_token.clone())?;
            CLIProgram::new(api, config).sync(force).await
        }
        Command::Init => cli_program::init_config(&config_path),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}
