//! Merchant rule commands

use anyhow::Result;
use kiwi_core::db::Database;

pub fn cmd_rules_list(db: &Database) -> Result<()> {
    let rules = db.list_merchant_rules()?;

    if rules.is_empty() {
        println!("No merchant rules learned yet.");
        println!("Rules are learned automatically from SMS analysis, or set one:");
        println!("  kiwi rules set SWIGGY Food");
        return Ok(());
    }

    println!();
    println!("📋 Merchant rules ({})", rules.len());
    println!("   ─────────────────────────────────────────────");
    for rule in rules {
        println!(
            "   {:<24} {:<16} learned {}",
            rule.merchant_name,
            rule.category,
            rule.learned_at.format("%Y-%m-%d")
        );
    }
    println!();

    Ok(())
}

pub fn cmd_rules_set(db: &Database, merchant: &str, category: &str) -> Result<()> {
    let rule = db.set_merchant_rule(merchant, category)?;
    println!(
        "✅ Rule set: {} -> {}",
        rule.merchant_name, rule.category
    );
    Ok(())
}
