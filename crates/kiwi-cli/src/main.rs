//! Kiwi CLI - Expense tracker backend
//!
//! Usage:
//!   kiwi init                 Initialize database
//!   kiwi serve --port 3000    Start web server
//!   kiwi analyze "SMS text"   Extract a transaction from SMS text
//!   kiwi status               Show database status

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            no_auth,
        } => commands::cmd_serve(&cli.db, &host, port, no_auth, cli.no_encrypt).await,
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
        Commands::Analyze { sms } => commands::cmd_analyze(&cli.db, &sms, cli.no_encrypt).await,
        Commands::Rules { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(RulesAction::List) => commands::cmd_rules_list(&db),
                Some(RulesAction::Set { merchant, category }) => {
                    commands::cmd_rules_set(&db, &merchant, &category)
                }
            }
        }
    }
}
