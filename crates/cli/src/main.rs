//! Vadaf Joyería CLI - catalog and contact maintenance.
//!
//! Works directly on the storefront's JSON data file, so it can be used
//! while the server is stopped (or to inspect a copy).
//!
//! # Usage
//!
//! ```bash
//! # List published listings, newest first
//! vadaf-cli products list
//!
//! # Remove a listing by id
//! vadaf-cli products remove 1718000000000
//!
//! # Show or reset the contact details
//! vadaf-cli contacts show
//! vadaf-cli contacts reset
//!
//! # Write the default contact details if none are stored
//! vadaf-cli seed
//! ```
//!
//! # Environment Variables
//!
//! - `VADAF_DATA_FILE` - JSON store file (default: data/store.json)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vadaf_core::ProductId;

mod commands;

#[derive(Parser)]
#[command(name = "vadaf-cli")]
#[command(author, version, about = "Vadaf Joyería CLI tools")]
struct Cli {
    /// JSON store file shared with the storefront
    #[arg(long, env = "VADAF_DATA_FILE", default_value = "data/store.json", global = true)]
    data_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage catalog listings
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage the contact details
    Contacts {
        #[command(subcommand)]
        action: ContactAction,
    },
    /// Write the default contact details if none are stored
    Seed,
}

#[derive(Subcommand)]
enum ProductAction {
    /// List listings, newest first
    List,
    /// Remove a listing
    Remove {
        /// Listing id
        id: ProductId,
    },
}

#[derive(Subcommand)]
enum ContactAction {
    /// Show the stored contact details
    Show,
    /// Restore the built-in contact details
    Reset,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vadaf_cli=info,vadaf_core=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let store = commands::open_store(&cli.data_file).await?;

    match cli.command {
        Commands::Products { action } => match action {
            ProductAction::List => commands::products::list(&store).await,
            ProductAction::Remove { id } => commands::products::remove(&store, id).await?,
        },
        Commands::Contacts { action } => match action {
            ContactAction::Show => commands::contacts::show(&store).await?,
            ContactAction::Reset => commands::contacts::reset(&store).await?,
        },
        Commands::Seed => commands::seed::defaults(&store).await?,
    }
    Ok(())
}
