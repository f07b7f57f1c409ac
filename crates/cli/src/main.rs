//! Handycraft CLI - account and catalog management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create an admin account
//! hc-cli admin create -u "Siti Aminah" -e siti@example.com -p 'Batik2024'
//!
//! # Promote an existing account to admin
//! hc-cli admin promote -e siti@example.com
//!
//! # Merge products into the catalog
//! hc-cli products import seed/products.json
//! ```
//!
//! The data directory comes from `HANDYCRAFT_DATA_DIR` (or `.env`) unless
//! `--data-dir` is given.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use handycraft_server::config::ServerConfig;

mod commands;

#[derive(Parser)]
#[command(name = "hc-cli")]
#[command(author, version, about = "Handycraft store CLI tools")]
struct Cli {
    /// Override the data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Manage the product catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Display name
        #[arg(short, long)]
        username: String,

        /// Login email address
        #[arg(short, long)]
        email: String,

        /// Initial password
        #[arg(short, long)]
        password: String,
    },
    /// Grant admin to an existing account
    Promote {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Import products from a JSON file
    Import {
        /// JSON array of products
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ServerConfig::from_env()?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    match cli.command {
        Commands::Admin { action } => match action {
            AdminAction::Create {
                username,
                email,
                password,
            } => {
                commands::admin::create_user(
                    &config.data_dir,
                    &config.protected_username,
                    &username,
                    &email,
                    &password,
                )
                .await?;
            }
            AdminAction::Promote { email } => {
                commands::admin::promote_user(
                    &config.data_dir,
                    &config.protected_username,
                    &email,
                )
                .await?;
            }
        },
        Commands::Products { action } => match action {
            ProductAction::Import { file } => {
                commands::products::import(&config.data_dir, &file).await?;
            }
        },
    }
    Ok(())
}
