//! Learned merchant -> category rules
//!
//! The first confirmed category for a merchant is remembered and reused for
//! every later sighting of that merchant, so the generative backend is only
//! consulted once per merchant.

use rusqlite::{params, Row};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{normalize_merchant, CategoryResolution, MerchantRule};

use super::{parse_datetime, Database};

fn row_to_rule(row: &Row) -> rusqlite::Result<MerchantRule> {
    let learned_at: String = row.get("learned_at")?;
    Ok(MerchantRule {
        merchant_name: row.get("merchant_name")?,
        category: row.get("category")?,
        learned_at: parse_datetime(&learned_at),
    })
}

impl Database {
    /// Resolve the category for a merchant, learning `suggested` if the
    /// merchant is new.
    ///
    /// First write wins: if a rule already exists, it is returned unchanged and
    /// the suggestion is discarded. Learn-if-absent is a single atomic insert,
    /// so two concurrent resolutions of a new merchant agree on one rule.
    pub fn resolve_category(&self, merchant: &str, suggested: &str) -> Result<CategoryResolution> {
        let name = normalize_merchant(merchant);
        if name.is_empty() {
            return Err(Error::InvalidInput(
                "merchant name must not be empty".to_string(),
            ));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO merchant_rules (merchant_name, category)
             VALUES (?1, ?2)
             ON CONFLICT(merchant_name) DO NOTHING",
            params![name, suggested],
        )?;

        // changes() == 1 means our suggestion became the rule
        let learned_now = conn.changes() == 1;

        let category: String = conn.query_row(
            "SELECT category FROM merchant_rules WHERE merchant_name = ?1",
            params![name],
            |row| row.get(0),
        )?;

        if learned_now {
            info!(merchant = %name, category = %category, "Learned merchant rule");
        } else {
            debug!(merchant = %name, category = %category, "Merchant rule hit");
        }

        Ok(CategoryResolution {
            category,
            from_memory: !learned_now,
        })
    }

    /// Look up the rule for a merchant without learning anything
    pub fn get_merchant_rule(&self, merchant: &str) -> Result<Option<MerchantRule>> {
        let name = normalize_merchant(merchant);
        let conn = self.conn()?;
        let rule = conn
            .query_row(
                "SELECT * FROM merchant_rules WHERE merchant_name = ?1",
                params![name],
                row_to_rule,
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                e => Err(e),
            })?;
        Ok(rule)
    }

    /// List all learned rules, alphabetical by merchant
    pub fn list_merchant_rules(&self) -> Result<Vec<MerchantRule>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT * FROM merchant_rules ORDER BY merchant_name ASC")?;

        let rows = stmt.query_map([], row_to_rule)?;
        let mut rules = Vec::new();
        for row in rows {
            rules.push(row?);
        }
        Ok(rules)
    }

    /// Explicitly set the rule for a merchant, overwriting any learned one.
    ///
    /// This is the correction path; automatic learning never overwrites.
    pub fn set_merchant_rule(&self, merchant: &str, category: &str) -> Result<MerchantRule> {
        let name = normalize_merchant(merchant);
        if name.is_empty() {
            return Err(Error::InvalidInput(
                "merchant name must not be empty".to_string(),
            ));
        }
        if category.trim().is_empty() {
            return Err(Error::InvalidInput(
                "category must not be empty".to_string(),
            ));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO merchant_rules (merchant_name, category)
             VALUES (?1, ?2)
             ON CONFLICT(merchant_name) DO UPDATE SET
                 category = excluded.category,
                 learned_at = CURRENT_TIMESTAMP",
            params![name, category.trim()],
        )?;

        info!(merchant = %name, category = %category, "Merchant rule set");

        let rule = conn.query_row(
            "SELECT * FROM merchant_rules WHERE merchant_name = ?1",
            params![name],
            row_to_rule,
        )?;
        Ok(rule)
    }

    /// Count learned rules
    pub fn count_merchant_rules(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM merchant_rules", [], |row| row.get(0))?;
        Ok(count)
    }
}
