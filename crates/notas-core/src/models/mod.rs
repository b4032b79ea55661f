//! Data models: records, report columns and configuration.

pub mod columns;
pub mod config;
pub mod record;
