//! Karma Tipper - send $DEGEN tips on Base from the command line
//!
//! Tips are real token transfers. They cannot be undone.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::error;

use karma_tipper::cli::commands;
use karma_tipper::config::Config;

/// Karma Tipper - support creators with $DEGEN tips
#[derive(Parser)]
#[command(name = "tipper")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "tipper.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available wallet connectors
    Connectors,

    /// Connect a wallet and show the profile
    Connect {
        /// Connector id (default: from config)
        #[arg(long)]
        connector: Option<String>,

        /// Frame host context as JSON, e.g. '{"user":{"username":"alice"}}'
        #[arg(long, env = "TIPPER_FRAME_CONTEXT")]
        context: Option<String>,
    },

    /// Show wallet session and network status
    Status {
        #[arg(long)]
        connector: Option<String>,
    },

    /// Connect, then drop the wallet session
    Disconnect {
        #[arg(long)]
        connector: Option<String>,
    },

    /// Switch the wallet to the target network
    Switch {
        #[arg(long)]
        connector: Option<String>,
    },

    /// Send a tip
    Tip {
        /// Recipient address (0x...)
        recipient: String,

        /// Amount in whole tokens, e.g. "100" or "12.5"
        #[arg(short, long, conflicts_with = "preset")]
        amount: Option<String>,

        /// One of the configured preset amounts
        #[arg(short, long)]
        preset: Option<u64>,

        #[arg(long)]
        connector: Option<String>,

        #[arg(long, env = "TIPPER_FRAME_CONTEXT")]
        context: Option<String>,

        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// Walk through the onboarding tutorial
    Onboarding {
        /// View the tutorial again after completing it
        #[arg(long)]
        replay: bool,
    },

    /// Show how an address (and optional username) is displayed
    Profile {
        address: String,

        #[arg(long)]
        username: Option<String>,
    },

    /// Print the frame manifest
    Manifest,

    /// Print the fc:miniapp / fc:frame embed meta tags
    Embed,

    /// Show current configuration (secrets masked)
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("karma_tipper=info".parse()?),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Connectors => commands::connectors(&config),
        Commands::Connect { connector, context } => {
            commands::connect(&config, connector.as_deref(), context.as_deref()).await
        }
        Commands::Status { connector } => commands::status(&config, connector.as_deref()).await,
        Commands::Disconnect { connector } => {
            commands::disconnect(&config, connector.as_deref()).await
        }
        Commands::Switch { connector } => commands::switch(&config, connector.as_deref()).await,
        Commands::Tip {
            recipient,
            amount,
            preset,
            connector,
            context,
            force,
        } => {
            commands::tip(
                &config,
                &recipient,
                amount.as_deref(),
                preset,
                connector.as_deref(),
                context.as_deref(),
                force,
            )
            .await
        }
        Commands::Onboarding { replay } => commands::onboarding(&config, replay),
        Commands::Profile { address, username } => {
            commands::profile(&config, &address, username.as_deref())
        }
        Commands::Manifest => commands::manifest(&config),
        Commands::Embed => commands::embed(&config),
        Commands::Config => commands::show_config(&config),
    };

    if let Err(e) = result {
        error!("Command failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
