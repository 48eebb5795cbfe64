use anyhow::Context;
use blitz_core::BlitzConfig;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "blitz", version, about = "Blitz encrypted-reference file gateway")]
struct Cli {
    /// Path to the configuration file
    #[arg(
        long,
        global = true,
        env = "BLITZ_CONFIG",
        default_value = "blitz.yaml"
    )]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP gateway.
    Serve,

    /// Reference key management
    Keys {
        #[command(subcommand)]
        cmd: KeysCommand,
    },

    /// Encode or decode reference tokens
    Token {
        #[command(subcommand)]
        cmd: TokenCommand,
    },
}

#[derive(Subcommand, Debug)]
enum KeysCommand {
    /// Generate a new random AES key.
    Generate {
        /// Key size in bytes (16, 24 or 32)
        #[arg(long, default_value_t = 32)]
        size: usize,

        /// Write the hex key to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Mint a token for a reference.
    Encode {
        /// Plaintext reference, e.g. `invoice.pdf`
        reference: String,

        /// Key as a file path or hex (defaults to the configured key)
        #[arg(long)]
        key: Option<String>,
    },

    /// Recover the reference inside a token.
    Decode {
        token: String,

        /// Key as a file path or hex (defaults to the configured key)
        #[arg(long)]
        key: Option<String>,
    },
}

/// Load the configuration file, or defaults when it does not exist.
fn load_config(path: &Path) -> anyhow::Result<(BlitzConfig, bool)> {
    if !path.exists() {
        return Ok((BlitzConfig::default(), false));
    }
    let config = BlitzConfig::load(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    Ok((config, true))
}

fn init_tracing(config: &BlitzConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, found) = load_config(&cli.config)?;
    init_tracing(&config);
    if !found {
        tracing::info!(path = %cli.config.display(), "No configuration file, using defaults");
    }

    match cli.cmd {
        Command::Serve => commands::serve::run(&config).await?,

        Command::Keys { cmd } => match cmd {
            KeysCommand::Generate { size, output } => commands::keys::generate(size, output)?,
        },

        Command::Token { cmd } => match cmd {
            TokenCommand::Encode { reference, key } => {
                println!("{}", commands::token::encode(&config, key, &reference)?)
            }
            TokenCommand::Decode { token, key } => {
                println!("{}", commands::token::decode(&config, key, &token)?)
            }
        },
    }

    Ok(())
}
