//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Kiwi - Expense tracking backend with SMS extraction
#[derive(Parser)]
#[command(name = "kiwi")]
#[command(about = "Self-hosted expense tracker with SMS transaction extraction", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "kiwi.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set KIWI_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// By default, the server requires an API key (KIWI_API_KEYS).
        #[arg(long)]
        no_auth: bool,
    },

    /// Show database status (encryption, size, counts)
    Status,

    /// Analyze an SMS message without storing anything
    Analyze {
        /// SMS text to analyze
        sms: String,
    },

    /// Manage merchant rules (list, set)
    Rules {
        #[command(subcommand)]
        action: Option<RulesAction>,
    },
}

#[derive(Subcommand)]
pub enum RulesAction {
    /// List learned merchant rules
    List,

    /// Set the category for a merchant (overwrites a learned rule)
    Set {
        /// Merchant name
        merchant: String,
        /// Category to assign
        category: String,
    },
}
