//! Domain models for Kiwi

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Transaction kind - whether money left or entered the account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[default]
    Expense,
    Income,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }

    pub fn is_income(&self) -> bool {
        matches!(self, Self::Income)
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expense" | "debit" => Ok(Self::Expense),
            "income" | "credit" => Ok(Self::Income),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalize a merchant name for storage and rule lookup.
///
/// Merchant names are trimmed and uppercased so that "Swiggy" and "SWIGGY "
/// hit the same learned rule.
pub fn normalize_merchant(name: &str) -> String {
    name.trim().to_uppercase()
}

/// A persisted transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: String,
    /// Normalized merchant name (trimmed, uppercased)
    pub merchant: String,
    pub amount: f64,
    pub category: String,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    /// Client-assigned id, present for records created through sync
    pub client_id: Option<String>,
    /// Redundant with `kind`; kept for API compatibility with older clients
    pub is_income: bool,
    pub created_at: DateTime<Utc>,
}

/// A new transaction to be inserted (before DB insertion)
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    pub user_id: String,
    pub merchant: String,
    pub amount: f64,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default, alias = "type")]
    pub kind: TransactionKind,
    pub date: NaiveDate,
}

fn default_category() -> String {
    "Other".to_string()
}

impl NewTransaction {
    /// Hash of the natural dedup key: (user, amount, merchant, date, kind).
    ///
    /// Amount is fixed to two decimals so 450.0 and 450.00 collide.
    pub fn dedup_hash(&self) -> String {
        let merchant = normalize_merchant(&self.merchant);
        let input = format!(
            "{}|{:.2}|{}|{}|{}",
            self.user_id, self.amount, merchant, self.date, self.kind
        );
        let mut hasher = Sha256::new();
        hasher.update(input.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// A transaction carrying a client-assigned id, used by bulk sync.
///
/// Sync identity is the client id, not the natural dedup key; the two
/// identity models are deliberately kept on separate operations.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncTransaction {
    pub client_id: String,
    #[serde(flatten)]
    pub tx: NewTransaction,
}

/// Result of inserting a transaction
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    /// Transaction was persisted
    Inserted(Transaction),
    /// An identical transaction (same natural key) already exists; no write
    Skipped,
}

/// Result of deleting a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// No row with that id; not an error
    NotFound,
}

/// A learned merchant -> category rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantRule {
    /// Normalized merchant name, unique
    pub merchant_name: String,
    pub category: String,
    pub learned_at: DateTime<Utc>,
}

/// How a category was resolved for a merchant
#[derive(Debug, Clone, Serialize)]
pub struct CategoryResolution {
    pub category: String,
    /// True when the category came from a previously learned rule
    pub from_memory: bool,
}

/// A transaction candidate extracted from an SMS, before persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionCandidate {
    pub merchant: String,
    pub amount: f64,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    /// Category suggested by the extractor (may be overridden by memory)
    pub category: String,
}

/// Outcome of extracting a candidate from SMS text
#[derive(Debug, Clone)]
pub enum ExtractionOutcome {
    Candidate(TransactionCandidate),
    /// The text was understood but is not a financial transaction
    /// (OTP, promotion, balance alert). A valid non-error outcome.
    NotATransaction,
}

/// Category-resolved result of analyzing an SMS
#[derive(Debug, Clone, Serialize)]
pub struct SmsAnalysis {
    pub merchant: String,
    pub amount: f64,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub category: String,
    pub from_memory: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("expense".parse::<TransactionKind>().unwrap(), TransactionKind::Expense);
        assert_eq!("Debit".parse::<TransactionKind>().unwrap(), TransactionKind::Expense);
        assert_eq!("income".parse::<TransactionKind>().unwrap(), TransactionKind::Income);
        assert_eq!("CREDIT".parse::<TransactionKind>().unwrap(), TransactionKind::Income);
        assert!("transfer".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn test_normalize_merchant() {
        assert_eq!(normalize_merchant("  Swiggy "), "SWIGGY");
        assert_eq!(normalize_merchant("SWIGGY"), "SWIGGY");
    }

    #[test]
    fn test_dedup_hash_is_stable_under_formatting() {
        let a = NewTransaction {
            user_id: "u1".into(),
            merchant: "Swiggy".into(),
            amount: 450.0,
            category: "Food".into(),
            kind: TransactionKind::Expense,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        let mut b = a.clone();
        b.merchant = "  SWIGGY ".into();
        b.category = "Other".into(); // category is not part of the key
        assert_eq!(a.dedup_hash(), b.dedup_hash());
    }

    #[test]
    fn test_dedup_hash_differs_on_key_fields() {
        let a = NewTransaction {
            user_id: "u1".into(),
            merchant: "SWIGGY".into(),
            amount: 450.0,
            category: "Food".into(),
            kind: TransactionKind::Expense,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };

        let mut other_amount = a.clone();
        other_amount.amount = 450.01;
        assert_ne!(a.dedup_hash(), other_amount.dedup_hash());

        let mut other_date = a.clone();
        other_date.date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        assert_ne!(a.dedup_hash(), other_date.dedup_hash());

        let mut other_kind = a.clone();
        other_kind.kind = TransactionKind::Income;
        assert_ne!(a.dedup_hash(), other_kind.dedup_hash());
    }
}
