// MiniDB Console
// Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use minidb_console::api::MiniDbClient;
use minidb_console::cli::{run_once, Console, OneShot, Renderer};
use minidb_console::config::load_config;
use minidb_console::logging::init_tracing;
use minidb_console::session::QueryDispatcher;

/// Terminal console for a MiniDB server
#[derive(Parser, Debug)]
#[command(name = "minidb-console")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Server base URL. Overrides config file and MINIDB_SERVER_URL.
    #[arg(short, long, global = true)]
    server: Option<String>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive console (default)
    Repl,

    /// Run one command on the server and print its outcome
    Exec {
        /// Command text, e.g. "MAKE users (id, name)"
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// List tables known to the server
    Tables,

    /// Print all rows of a table
    Show {
        table: String,
    },

    /// Bulk-load a CSV file
    Upload {
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = load_config(cli.config.as_deref(), cli.server.as_deref())?;
    if cli.no_color {
        config.console.color = false;
    }

    // Initialize tracing
    init_tracing(cli.log_level.as_deref(), config.log_level.as_deref());

    let client = MiniDbClient::new(config.server.base_url.clone(), config.server.request_timeout())?;
    let mut dispatcher = QueryDispatcher::new(Arc::new(client));

    let action = match cli.command {
        None | Some(Command::Repl) => {
            let mut console = Console::new(dispatcher, &config.console, &config.server.base_url)?;
            console.run().await?;
            return Ok(ExitCode::SUCCESS);
        }
        Some(Command::Exec { query }) => OneShot::Exec(query.join(" ")),
        Some(Command::Tables) => OneShot::Tables,
        Some(Command::Show { table }) => OneShot::Show(table),
        Some(Command::Upload { file }) => OneShot::Upload(file),
    };

    let renderer = Renderer::new(config.console.color);
    let ok = run_once(&mut dispatcher, &renderer, action).await?;

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
