//! JSON parsing for extraction responses
//!
//! Model responses often wrap the JSON payload in markdown fences or prose.
//! These helpers locate the JSON object, deserialize it, and map it onto the
//! extraction outcome.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::{ExtractionOutcome, TransactionCandidate, TransactionKind};

/// Raw shape of an extraction response, before validation
#[derive(Debug, Deserialize)]
struct RawExtraction {
    #[serde(default)]
    not_a_transaction: bool,
    merchant: Option<String>,
    amount: Option<f64>,
    #[serde(alias = "type")]
    kind: Option<String>,
    date: Option<String>,
    category: Option<String>,
}

fn truncate(s: &str) -> String {
    if s.len() <= 200 {
        return s.to_string();
    }
    // Back off to a char boundary; responses may echo multi-byte
    // currency symbols from the SMS
    let mut end = 200;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

/// Find the JSON object in a model response.
///
/// Handles markdown fences and surrounding prose by taking the span from the
/// first '{' to the last '}'.
fn extract_json(response: &str) -> Result<&str> {
    let start = response.find('{');
    let end = response.rfind('}');

    match (start, end) {
        (Some(s), Some(e)) if s < e => Ok(&response[s..=e]),
        _ => Err(Error::Extraction(format!(
            "No JSON found in model response | Raw: {}",
            truncate(response)
        ))),
    }
}

/// Parse an extraction response into a candidate or the not-a-transaction outcome
pub fn parse_extraction(response: &str) -> Result<ExtractionOutcome> {
    let json_str = extract_json(response.trim())?;

    let raw: RawExtraction = serde_json::from_str(json_str).map_err(|e| {
        Error::Extraction(format!(
            "Invalid JSON from model: {} | Raw: {}",
            e,
            truncate(json_str)
        ))
    })?;

    if raw.not_a_transaction {
        return Ok(ExtractionOutcome::NotATransaction);
    }

    let merchant = raw
        .merchant
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| missing_field("merchant", json_str))?;
    let amount = raw.amount.ok_or_else(|| missing_field("amount", json_str))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::Extraction(format!(
            "Extracted amount is not a valid positive number: {}",
            amount
        )));
    }

    let kind = raw
        .kind
        .as_deref()
        .map(str::parse::<TransactionKind>)
        .transpose()
        .map_err(Error::Extraction)?
        .unwrap_or_default();

    let date_str = raw.date.ok_or_else(|| missing_field("date", json_str))?;
    let date = chrono::NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
        Error::Extraction(format!("Invalid date '{}' from model: {}", date_str, e))
    })?;

    let category = raw
        .category
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| "Other".to_string());

    Ok(ExtractionOutcome::Candidate(TransactionCandidate {
        merchant,
        amount,
        kind,
        date,
        category,
    }))
}

fn missing_field(field: &str, raw: &str) -> Error {
    Error::Extraction(format!(
        "Model response missing '{}' | Raw: {}",
        field,
        truncate(raw)
    ))
}
