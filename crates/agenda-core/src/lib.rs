//! Shared domain types, configuration and errors for the agenda workspace.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
