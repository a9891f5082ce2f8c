//! CLI entry and dispatch.

use anyhow::{Context, Result};
use chatroom_core::Config;
use chatroom_core::logging::{self, LoggingHandle};
use clap::Parser;

mod commands;

#[derive(Parser)]
#[command(name = "chatroom")]
#[command(version)]
#[command(about = "Terminal client for chatroom sessions")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Backend HTTP base URL (overrides config)
    #[arg(long, value_name = "URL", global = true)]
    api_url: Option<String>,

    /// Live update websocket base URL (overrides config)
    #[arg(long, value_name = "URL", global = true)]
    ws_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Interactive chat (default)
    Chat {
        /// Session to open on start
        #[arg(value_name = "SESSION")]
        session: Option<String>,
    },
    /// Manage sessions
    Sessions {
        #[command(subcommand)]
        command: SessionCommands,
    },
    /// List sessions whose messages contain text
    Search {
        #[arg(value_name = "QUERY")]
        query: String,
    },
    /// Show the deleted-message history of a session
    Deleted {
        #[arg(value_name = "SESSION")]
        session: String,
    },
    /// Restore deleted messages, oldest first
    Restore {
        #[arg(value_name = "SESSION")]
        session: String,
        /// Entries as TS-DELETED_AT, as printed by `deleted`
        #[arg(value_name = "ENTRY", required = true)]
        entries: Vec<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show hourly message counts for a session
    Trend {
        #[arg(value_name = "SESSION")]
        session: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum SessionCommands {
    /// Lists sessions
    List,
    /// Creates a session
    Add {
        #[arg(value_name = "SESSION")]
        session: String,
    },
    /// Deletes a session and its messages
    Delete {
        #[arg(value_name = "SESSION")]
        session: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli {
        command,
        api_url,
        ws_url,
    } = cli;

    // Everything except `config` talks to the backend.
    let connect = move || -> Result<(Config, LoggingHandle)> {
        let mut config = Config::load().context("load config")?;
        config.apply_overrides(api_url, ws_url);
        let logging = logging::init_logging().context("initialize logging")?;
        Ok((config, logging))
    };

    // default to chat mode
    let command = command.unwrap_or(Commands::Chat { session: None });

    match command {
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
        Commands::Chat { session } => {
            let (config, logging) = connect()?;
            commands::chat::run(&config, &logging, session).await
        }
        Commands::Sessions { command } => {
            let (config, _logging) = connect()?;
            match command {
                SessionCommands::List => commands::sessions::list(&config).await,
                SessionCommands::Add { session } => {
                    commands::sessions::add(&config, &session).await
                }
                SessionCommands::Delete { session, yes } => {
                    commands::sessions::delete(&config, &session, yes).await
                }
            }
        }
        Commands::Search { query } => {
            let (config, _logging) = connect()?;
            commands::sessions::search(&config, &query).await
        }
        Commands::Deleted { session } => {
            let (config, _logging) = connect()?;
            commands::messages::deleted(&config, &session).await
        }
        Commands::Restore {
            session,
            entries,
            yes,
        } => {
            let (config, _logging) = connect()?;
            commands::messages::restore(&config, &session, &entries, yes).await
        }
        Commands::Trend { session } => {
            let (config, _logging) = connect()?;
            commands::messages::trend(&config, &session).await
        }
    }
}
