//! argocd-mcp CLI
//!
//! Inspect configuration, list tools, and call tools against a snapshot
//! of Argo CD state.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod commands;

use argomcp_core::{Config, LogFormat, LoggingConfig};
use clap::{Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use commands::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "argocd-mcp")]
#[command(about = "Argo CD tools for MCP clients with bounded, reviewable output", long_about = None)]
struct Cli {
    /// Config file (default: ./argocd-mcp.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version
    Version,
    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// List tools with their side effects
    Tools,
    /// Call a tool
    Call {
        /// Tool name
        tool: String,
        /// Arguments as key=value pairs, or `-` to read a JSON object from stdin
        args: Vec<String>,
        /// JSON snapshot of platform state
        #[arg(short, long)]
        snapshot: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        output: OutputFormat,
        /// Refuse write operations
        #[arg(long)]
        safe_mode: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default config file
    Init {
        /// Destination (default: the --config path, then the user config dir)
        #[arg(long)]
        path: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective config with credentials masked
    Show,
}

fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("argocd-mcp {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    if let Commands::Config {
        action: ConfigAction::Init { path, force },
    } = &cli.command
    {
        let path = path
            .clone()
            .or_else(|| cli.config.clone())
            .or_else(Config::default_path)
            .ok_or_else(|| color_eyre::eyre::eyre!("No config directory; pass --path"))?;
        commands::config_init(&path, *force)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref()).wrap_err("Failed to load configuration")?;
    init_logging(&config.logging);
    tracing::info!(safe_mode = config.server.safe_mode, "argocd-mcp starting");

    match cli.command {
        Commands::Config {
            action: ConfigAction::Show,
        } => {
            print!("{}", config.to_masked_toml_string()?);
            Ok(())
        }
        Commands::Tools => {
            print!("{}", commands::list_tools(&config));
            Ok(())
        }
        Commands::Call {
            tool,
            args,
            snapshot,
            output,
            safe_mode,
        } => {
            let args = commands::read_arguments(&args, std::io::stdin().lock())?;
            let text = commands::call(
                &config,
                &snapshot,
                safe_mode || config.server.safe_mode,
                &tool,
                args,
            )
            .await?;
            println!("{}", commands::render(&text, output)?);
            Ok(())
        }
        Commands::Version
        | Commands::Config {
            action: ConfigAction::Init { .. },
        } => Ok(()),
    }
}
