//! Mock backend for testing
//!
//! Returns canned responses keyed on prompt content so the SMS pipeline can be
//! exercised without a network.

use async_trait::async_trait;

use crate::error::Result;

use super::AiBackend;

/// Mock backend with deterministic responses
#[derive(Clone)]
pub struct MockBackend {
    healthy: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self { healthy: true }
    }

    /// Create a mock that reports itself as unreachable
    pub fn unhealthy() -> Self {
        Self { healthy: false }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiBackend for MockBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let upper = prompt.to_uppercase();

        // Non-transaction texts: OTPs, promotions, balance alerts
        if upper.contains("OTP") || upper.contains("PROMO") || upper.contains("AVAILABLE BALANCE") {
            return Ok(r#"{"not_a_transaction": true}"#.to_string());
        }

        if upper.contains("SWIGGY") {
            return Ok(r#"```json
{"merchant": "SWIGGY", "amount": 450.00, "type": "expense", "date": "2024-03-01", "category": "Food"}
```"#
                .to_string());
        }

        if upper.contains("SALARY") || upper.contains("CREDITED") {
            return Ok(
                r#"{"merchant": "ACME CORP", "amount": 50000.00, "type": "income", "date": "2024-03-01", "category": "Other"}"#
                    .to_string(),
            );
        }

        if upper.contains("UBER") {
            return Ok(
                r#"{"merchant": "UBER", "amount": 230.50, "type": "expense", "date": "2024-03-02", "category": "Travel"}"#
                    .to_string(),
            );
        }

        // Generic fallback candidate
        Ok(
            r#"{"merchant": "UNKNOWN MERCHANT", "amount": 100.00, "type": "expense", "date": "2024-03-01", "category": "Other"}"#
                .to_string(),
        )
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
