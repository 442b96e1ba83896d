// ABOUTME: Library root for ec2sh - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod diagnostics;
pub mod directory;
pub mod error;
pub mod output;
pub mod resolve;
pub mod session;
pub mod ssh;
pub mod types;
