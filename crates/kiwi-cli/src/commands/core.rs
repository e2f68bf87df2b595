//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use kiwi_core::db::Database;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let _db = open_db(db_path, no_encrypt)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Start the API server: kiwi serve");
    println!("  2. Try SMS extraction: kiwi analyze \"Rs 450 debited for Swiggy\"");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_db_unencrypted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");

        let db = open_db(&path, true).unwrap();
        assert_eq!(db.count_transactions().unwrap(), 0);
        assert!(path.exists());
    }

    #[test]
    fn test_open_db_requires_key_when_encrypted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enc.db");

        // No KIWI_DB_KEY in the test environment
        if std::env::var(kiwi_core::db::DB_KEY_ENV).is_err() {
            assert!(open_db(&path, false).is_err());
        }
    }
}
