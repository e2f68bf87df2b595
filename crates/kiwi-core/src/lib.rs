//! Kiwi Core Library
//!
//! Shared functionality for the Kiwi expense tracker backend:
//! - Database access and migrations
//! - Transaction storage with natural-key duplicate suppression
//! - Merchant -> category rule memory
//! - SMS transaction extraction via pluggable generative backends

pub mod ai;
pub mod db;
pub mod error;
pub mod models;
pub mod sms;

pub use ai::{AiBackend, AiClient, GeminiBackend, MockBackend};
pub use db::Database;
pub use error::{Error, Result};
pub use models::{
    normalize_merchant, CategoryResolution, DeleteOutcome, ExtractionOutcome, InsertOutcome,
    MerchantRule, NewTransaction, SmsAnalysis, SyncTransaction, Transaction, TransactionCandidate,
    TransactionKind,
};
pub use sms::{SmsExtractor, CATEGORIES};
