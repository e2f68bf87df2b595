//! SMS transaction extraction
//!
//! Turns raw bank SMS text into a structured transaction candidate via the
//! generative backend, then resolves the category through merchant memory.

use tracing::debug;

use crate::ai::{parsing::parse_extraction, AiBackend, AiClient};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{ExtractionOutcome, SmsAnalysis};

/// Categories the extractor is asked to choose from
pub const CATEGORIES: &[&str] = &[
    "Food",
    "Travel",
    "Shopping",
    "Bills",
    "Entertainment",
    "Health",
    "Other",
];

/// SMS extractor wrapping a generative backend
#[derive(Clone)]
pub struct SmsExtractor {
    ai: AiClient,
}

impl SmsExtractor {
    pub fn new(ai: AiClient) -> Self {
        Self { ai }
    }

    fn build_prompt(&self, sms_text: &str) -> String {
        format!(
            "You are a financial SMS parser. Analyze the SMS below and extract the transaction.\n\
             \n\
             Respond with ONLY a JSON object, no other text:\n\
             {{\"merchant\": \"<merchant name>\", \"amount\": <number>, \"type\": \"expense\" or \"income\", \"date\": \"YYYY-MM-DD\", \"category\": \"<category>\"}}\n\
             \n\
             Category must be one of: {}.\n\
             If the SMS is not a financial transaction (OTP, promotion, balance alert), respond with exactly:\n\
             {{\"not_a_transaction\": true}}\n\
             \n\
             SMS: {}",
            CATEGORIES.join(", "),
            sms_text
        )
    }

    /// Extract a transaction candidate from SMS text.
    ///
    /// Empty input is rejected before any backend call. Text the model
    /// recognizes as non-financial yields `NotATransaction`, which is a
    /// valid outcome rather than an error.
    pub async fn extract(&self, sms_text: &str) -> Result<ExtractionOutcome> {
        let text = sms_text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("SMS text must not be empty".to_string()));
        }

        let prompt = self.build_prompt(text);
        let response = self.ai.generate(&prompt).await?;
        debug!(model = %self.ai.model(), "Extraction response received");

        parse_extraction(&response)
    }

    /// Extract a candidate and resolve its category through merchant memory.
    ///
    /// A previously learned rule for the merchant overrides the model's
    /// suggestion; a new merchant learns the suggestion. Returns None when the
    /// text is not a transaction.
    pub async fn analyze(&self, db: &Database, sms_text: &str) -> Result<Option<SmsAnalysis>> {
        let candidate = match self.extract(sms_text).await? {
            ExtractionOutcome::Candidate(c) => c,
            ExtractionOutcome::NotATransaction => return Ok(None),
        };

        let resolution = db.resolve_category(&candidate.merchant, &candidate.category)?;

        Ok(Some(SmsAnalysis {
            merchant: candidate.merchant,
            amount: candidate.amount,
            kind: candidate.kind,
            date: candidate.date,
            category: resolution.category,
            from_memory: resolution.from_memory,
        }))
    }
}
