//! SMS analysis command

use std::path::Path;

use anyhow::{anyhow, Result};
use kiwi_core::ai::{AiBackend, AiClient};
use kiwi_core::sms::SmsExtractor;

use super::open_db;

pub async fn cmd_analyze(db_path: &Path, sms: &str, no_encrypt: bool) -> Result<()> {
    let ai = AiClient::from_env().ok_or_else(|| {
        anyhow!("No AI backend configured. Set GEMINI_API_KEY (or AI_BACKEND=mock for testing)")
    })?;

    println!("🔎 Analyzing SMS via {} ({})...", ai.host(), ai.model());

    let db = open_db(db_path, no_encrypt)?;
    let extractor = SmsExtractor::new(ai);

    match extractor.analyze(&db, sms).await? {
        Some(analysis) => {
            println!();
            println!("   Merchant: {}", analysis.merchant);
            println!("   Amount: {:.2}", analysis.amount);
            println!("   Type: {}", analysis.kind);
            println!("   Date: {}", analysis.date);
            if analysis.from_memory {
                println!("   Category: {} (from learned rule)", analysis.category);
            } else {
                println!("   Category: {} (learned just now)", analysis.category);
            }
        }
        None => {
            println!();
            println!("   Not a financial transaction (OTP, promotion, or alert)");
        }
    }

    println!();
    Ok(())
}
