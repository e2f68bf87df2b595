//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod health;
pub mod rules;
pub mod sms;
pub mod transactions;

// Re-export all handlers for use in router
pub use health::*;
pub use rules::*;
pub use sms::*;
pub use transactions::*;
