//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod chat;

use std::error::Error;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::auth::{self, KeyringCredentialStore};

#[derive(Parser)]
#[command(name = "merchat")]
#[command(about = "A terminal chat client for a product & supplier assistant")]
#[command(
    long_about = "Merchat is a terminal chat client that talks to a product & supplier \
assistant service. Answers arrive as plain text, product tables, or two-way \
product comparisons, and are rendered accordingly.\n\n\
Authentication:\n\
  Use 'merchat auth' to store your service token securely in the system keyring.\n\
  The MERCHAT_TOKEN environment variable overrides the keyring when set.\n\n\
Controls:\n\
  Type a question and press Enter to send it\n\
  /quit (or Ctrl+D) ends the session"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Assistant service base URL (overrides the configured value)
    #[arg(short = 'u', long, global = true, value_name = "URL")]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store the assistant service token
    Auth,
    /// Remove the stored token (logout)
    Deauth,
    /// Start the chat session (default)
    Chat,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    // Diagnostics go to stderr so they never interleave with the transcript.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Auth => {
            if let Err(e) = auth::store_credential_interactive(&KeyringCredentialStore::new()) {
                eprintln!("❌ Authentication failed: {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Deauth => {
            if let Err(e) = auth::clear_credential(&KeyringCredentialStore::new()) {
                eprintln!("❌ Deauthentication failed: {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Chat => chat::run_chat(args.base_url).await,
    }
}
