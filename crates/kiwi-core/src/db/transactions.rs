//! Transaction storage: insert with duplicate suppression, listing, delete, bulk sync

use rusqlite::{params, Row};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{
    normalize_merchant, DeleteOutcome, InsertOutcome, NewTransaction, SyncTransaction, Transaction,
    TransactionKind,
};

use super::{parse_datetime, Database};

fn row_to_transaction(row: &Row) -> rusqlite::Result<Transaction> {
    let kind_str: String = row.get("kind")?;
    let kind = kind_str
        .parse::<TransactionKind>()
        .unwrap_or(TransactionKind::Expense);
    let date_str: String = row.get("date")?;
    let date = chrono::NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .unwrap_or_else(|_| chrono::Utc::now().date_naive());
    let created_at: String = row.get("created_at")?;

    Ok(Transaction {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        merchant: row.get("merchant")?,
        amount: row.get("amount")?,
        category: row.get("category")?,
        kind,
        date,
        client_id: row.get("client_id")?,
        is_income: kind.is_income(),
        created_at: parse_datetime(&created_at),
    })
}

fn validate(tx: &NewTransaction) -> Result<()> {
    if tx.user_id.trim().is_empty() {
        return Err(Error::InvalidInput("user_id must not be empty".to_string()));
    }
    if tx.merchant.trim().is_empty() {
        return Err(Error::InvalidInput("merchant must not be empty".to_string()));
    }
    if !tx.amount.is_finite() {
        return Err(Error::InvalidInput(format!(
            "amount must be a finite number, got {}",
            tx.amount
        )));
    }
    Ok(())
}

impl Database {
    /// Insert a transaction, suppressing duplicates by natural key.
    ///
    /// Two transactions are duplicates when they share (user, amount, merchant,
    /// date, kind). The check and the write are a single atomic statement, so
    /// concurrent inserts of the same record produce exactly one row.
    pub fn insert_transaction(&self, tx: &NewTransaction) -> Result<InsertOutcome> {
        validate(tx)?;

        let conn = self.conn()?;
        let merchant = normalize_merchant(&tx.merchant);
        let hash = tx.dedup_hash();

        conn.execute(
            "INSERT INTO transactions (user_id, merchant, amount, category, kind, date, dedup_hash)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(dedup_hash) DO NOTHING",
            params![
                tx.user_id,
                merchant,
                tx.amount,
                tx.category,
                tx.kind.as_str(),
                tx.date.to_string(),
                hash
            ],
        )?;

        if conn.changes() == 0 {
            debug!(user_id = %tx.user_id, merchant = %merchant, "Duplicate transaction skipped");
            return Ok(InsertOutcome::Skipped);
        }

        let id = conn.last_insert_rowid();
        let inserted = conn.query_row(
            "SELECT * FROM transactions WHERE id = ?1",
            params![id],
            row_to_transaction,
        )?;

        info!(id, user_id = %tx.user_id, merchant = %merchant, "Transaction recorded");
        Ok(InsertOutcome::Inserted(inserted))
    }

    /// List all transactions for a user, most recent first.
    ///
    /// Ordered by transaction date, then by creation time for same-day records.
    pub fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT * FROM transactions WHERE user_id = ?1
             ORDER BY date DESC, created_at DESC, id DESC",
        )?;

        let rows = stmt.query_map(params![user_id], row_to_transaction)?;
        let mut transactions = Vec::new();
        for row in rows {
            transactions.push(row?);
        }
        Ok(transactions)
    }

    /// Count transactions across all users
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete a transaction by id. Deleting a missing id is not an error.
    pub fn delete_transaction(&self, id: i64) -> Result<DeleteOutcome> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM transactions WHERE id = ?1", params![id])?;

        if changed == 0 {
            return Ok(DeleteOutcome::NotFound);
        }
        info!(id, "Transaction deleted");
        Ok(DeleteOutcome::Deleted)
    }

    /// Bulk sync transactions keyed by client-assigned id.
    ///
    /// Each record is upserted on its client_id: a new id inserts, a known id
    /// overwrites that row's fields. Records whose natural key collides with an
    /// existing row (under a different client_id) are skipped, matching the
    /// single-insert dedup behavior. Returns the number of rows written.
    pub fn sync_transactions(&self, batch: &[SyncTransaction]) -> Result<usize> {
        let mut written = 0;

        for record in batch {
            validate(&record.tx)?;
            if record.client_id.trim().is_empty() {
                return Err(Error::InvalidInput(
                    "client_id must not be empty".to_string(),
                ));
            }

            let conn = self.conn()?;
            let merchant = normalize_merchant(&record.tx.merchant);
            let hash = record.tx.dedup_hash();

            let result = conn.execute(
                "INSERT INTO transactions
                     (user_id, merchant, amount, category, kind, date, client_id, dedup_hash)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(client_id) DO UPDATE SET
                     user_id = excluded.user_id,
                     merchant = excluded.merchant,
                     amount = excluded.amount,
                     category = excluded.category,
                     kind = excluded.kind,
                     date = excluded.date,
                     dedup_hash = excluded.dedup_hash",
                params![
                    record.tx.user_id,
                    merchant,
                    record.tx.amount,
                    record.tx.category,
                    record.tx.kind.as_str(),
                    record.tx.date.to_string(),
                    record.client_id,
                    hash
                ],
            );

            match result {
                Ok(_) => written += 1,
                // Natural-key duplicate of a row synced under another client_id
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    debug!(client_id = %record.client_id, "Sync record duplicates existing transaction, skipped");
                }
                Err(e) => return Err(e.into()),
            }
        }

        info!(written, total = batch.len(), "Sync batch processed");
        Ok(written)
    }
}
