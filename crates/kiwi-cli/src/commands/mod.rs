//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db)
//! - `analyze` - SMS analysis command
//! - `rules` - Merchant rule commands (list, set)
//! - `serve` - Web server command
//! - `status` - Database status command

pub mod analyze;
pub mod core;
pub mod rules;
pub mod serve;
pub mod status;

// Re-export command functions for main.rs
pub use analyze::*;
pub use core::*;
pub use rules::*;
pub use serve::*;
pub use status::*;
